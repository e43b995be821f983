// src/cli/task.rs — `diet-agent task`: inspect or control a remote task

use super::{render, App, TaskAction};
use crate::onboarding::missing_key_hint;
use crate::remote::{TaskAction as RemoteAction, TaskApi};

pub async fn run_task(app: &App, action: TaskAction) -> anyhow::Result<()> {
    if app.credential.is_none() {
        anyhow::bail!("{}", missing_key_hint());
    }
    let client = app.task_client()?;

    let (id, control) = match action {
        TaskAction::Status { id, json } => {
            let task = client.get_task(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                print!("{}", render::task(&task));
            }
            return Ok(());
        }
        TaskAction::Pause { id } => (id, RemoteAction::Pause),
        TaskAction::Resume { id } => (id, RemoteAction::Resume),
        TaskAction::Stop { id } => (id, RemoteAction::Stop),
    };

    client.control_task(&id, control).await?;
    println!("Task {}: {} requested", id, control.as_str());
    Ok(())
}
