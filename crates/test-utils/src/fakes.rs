use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use hostboot::errors::{HostbootError, Result};
use hostboot::launch::{LaunchPlan, Launcher};
use hostboot::metadata::MetadataSource;
use hostboot::prereq::{Prerequisite, PrerequisiteProbe};

/// Ordered record of every call the supervisor made into the fakes.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// How a [`FakeProbe`] answers.
#[derive(Debug, Clone, Copy)]
pub enum ProbeMode {
    /// Every condition is satisfied on the first probe.
    Ready,
    /// Every condition is satisfied from the n-th probe of that condition on.
    ReadyAfter(u32),
    /// Nothing is ever satisfied.
    Never,
    /// Every probe errors.
    Failing,
}

/// Fake prerequisite probe with a per-condition call counter.
pub struct FakeProbe {
    mode: ProbeMode,
    calls: Mutex<HashMap<Prerequisite, u32>>,
    log: CallLog,
}

impl FakeProbe {
    pub fn new(mode: ProbeMode, log: CallLog) -> Self {
        Self {
            mode,
            calls: Mutex::new(HashMap::new()),
            log,
        }
    }

    pub fn calls_for(&self, condition: &Prerequisite) -> u32 {
        self.calls.lock().unwrap().get(condition).copied().unwrap_or(0)
    }
}

impl PrerequisiteProbe for FakeProbe {
    fn is_satisfied<'a>(
        &'a self,
        condition: &'a Prerequisite,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>> {
        Box::pin(async move {
            let n = {
                let mut calls = self.calls.lock().unwrap();
                let n = calls.entry(condition.clone()).or_insert(0);
                *n += 1;
                *n
            };
            self.log.lock().unwrap().push(format!("probe {condition}"));

            match self.mode {
                ProbeMode::Ready => Ok(true),
                ProbeMode::ReadyAfter(k) => Ok(n >= k),
                ProbeMode::Never => Ok(false),
                ProbeMode::Failing => Err(HostbootError::Other(anyhow::anyhow!(
                    "probe exploded for {condition}"
                ))),
            }
        })
    }
}

/// One scripted metadata answer.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Body(String),
    Unavailable(String),
}

/// Fake metadata source replaying scripted answers in order.
pub struct FakeMetadata {
    responses: Mutex<VecDeque<FakeResponse>>,
    log: CallLog,
}

impl FakeMetadata {
    pub fn new(responses: Vec<FakeResponse>, log: CallLog) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            log,
        }
    }

    pub fn body(body: &str, log: CallLog) -> Self {
        Self::new(vec![FakeResponse::Body(body.to_string())], log)
    }

    pub fn unavailable(log: CallLog) -> Self {
        Self::new(
            vec![FakeResponse::Unavailable("connect timed out".to_string())],
            log,
        )
    }
}

impl MetadataSource for FakeMetadata {
    fn fetch_document(&self) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        Box::pin(async move {
            self.log.lock().unwrap().push("metadata".to_string());
            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(FakeResponse::Body(body)) => Ok(body),
                Some(FakeResponse::Unavailable(msg)) => {
                    Err(HostbootError::MetadataUnavailable(msg))
                }
                None => Err(HostbootError::MetadataUnavailable(
                    "no scripted response left".to_string(),
                )),
            }
        })
    }
}

/// Launcher that records plans instead of exec'ing.
pub struct RecordingLauncher {
    launched: Arc<Mutex<Vec<LaunchPlan>>>,
    fail_with: Option<String>,
    log: CallLog,
}

impl RecordingLauncher {
    pub fn new(launched: Arc<Mutex<Vec<LaunchPlan>>>, log: CallLog) -> Self {
        Self {
            launched,
            fail_with: None,
            log,
        }
    }

    pub fn failing(msg: &str, log: CallLog) -> Self {
        Self {
            launched: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
            log,
        }
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&mut self, plan: &LaunchPlan) -> Result<()> {
        self.log.lock().unwrap().push("launch".to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(HostbootError::Launch(msg.clone()));
        }
        self.launched.lock().unwrap().push(plan.clone());
        Ok(())
    }
}
