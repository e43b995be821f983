// src/remote/mock.rs — Scripted TaskApi for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use super::{CreateTaskRequest, Task, TaskAction, TaskApi, TaskStatus};
use crate::infra::errors::DietAgentError;

type Script = VecDeque<Result<Task, DietAgentError>>;

/// Replays scripted `get_task` results in order. Once the script runs out,
/// `fallback` produces every further result.
pub(crate) struct ScriptedApi {
    fetches: Mutex<Script>,
    fallback: Option<fn() -> DietAgentError>,
    creates: Mutex<VecDeque<Result<Task, DietAgentError>>>,
    created_requests: Mutex<Vec<CreateTaskRequest>>,
    fetch_times: Mutex<Vec<Instant>>,
    actions: Mutex<Vec<(String, TaskAction)>>,
}

impl ScriptedApi {
    pub(crate) fn new(fetches: Vec<Result<Task, DietAgentError>>) -> Self {
        Self {
            fetches: Mutex::new(fetches.into()),
            fallback: None,
            creates: Mutex::new(VecDeque::new()),
            created_requests: Mutex::new(Vec::new()),
            fetch_times: Mutex::new(Vec::new()),
            actions: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(err: fn() -> DietAgentError) -> Self {
        let mut api = Self::new(Vec::new());
        api.fallback = Some(err);
        api
    }

    /// Script `create_task` results. Unscripted creates succeed with a fresh id.
    pub(crate) fn with_creates(self, creates: Vec<Result<Task, DietAgentError>>) -> Self {
        *self.creates.lock().unwrap() = creates.into();
        self
    }

    pub(crate) fn push_fetches(&self, more: Vec<Result<Task, DietAgentError>>) {
        self.fetches.lock().unwrap().extend(more);
    }

    pub(crate) fn task(id: &str, status: TaskStatus, steps: u32) -> Task {
        let mut task = Task::new(id, status);
        if steps > 0 {
            task.steps = Some((0..steps).map(|i| serde_json::json!({ "step": i })).collect());
        }
        task
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetch_times.lock().unwrap().len()
    }

    pub(crate) fn fetch_gaps(&self) -> Vec<Duration> {
        let times = self.fetch_times.lock().unwrap();
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    pub(crate) fn created_requests(&self) -> Vec<CreateTaskRequest> {
        self.created_requests.lock().unwrap().clone()
    }

    pub(crate) fn actions(&self) -> Vec<(String, TaskAction)> {
        self.actions.lock().unwrap().clone()
    }
}

pub(crate) trait TaskExt {
    fn with_output(self, output: &str) -> Self;
    fn with_error(self, error: &str) -> Self;
}

impl TaskExt for Task {
    fn with_output(mut self, output: &str) -> Self {
        self.output = Some(output.to_string());
        self
    }

    fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

#[async_trait]
impl TaskApi for ScriptedApi {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, DietAgentError> {
        let mut requests = self.created_requests.lock().unwrap();
        requests.push(request.clone());
        let n = requests.len();
        drop(requests);
        match self.creates.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(Task::new(format!("task-{n}"), TaskStatus::Created)),
        }
    }

    async fn get_task(&self, _task_id: &str) -> Result<Task, DietAgentError> {
        self.fetch_times.lock().unwrap().push(Instant::now());
        match self.fetches.lock().unwrap().pop_front() {
            Some(result) => result,
            None => match self.fallback {
                Some(make) => Err(make()),
                None => Err(DietAgentError::RemoteFetch {
                    task_id: "unscripted".into(),
                    message: "script exhausted".into(),
                }),
            },
        }
    }

    async fn control_task(&self, task_id: &str, action: TaskAction) -> Result<(), DietAgentError> {
        self.actions
            .lock()
            .unwrap()
            .push((task_id.to_string(), action));
        Ok(())
    }
}
