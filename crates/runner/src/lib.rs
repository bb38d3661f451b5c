pub mod error;
mod hook_guard;
pub mod runner;
pub mod stream;

pub use error::RunnerError;
pub use runner::WorkflowRunner;
pub use stream::StreamCallback;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use masguard_adapter::{AgentInfo, MASAdapter, MockAdapter, WorkflowOptions};
    use masguard_core::{AgentName, StepType};
    use masguard_hooks::MessageInterception;

    use super::*;

    fn adapter_with_one_message() -> Arc<MockAdapter> {
        Arc::new(
            MockAdapter::new(vec![AgentInfo::new("A", "sender"), AgentInfo::new("B", "receiver")])
                .with_script(vec![(AgentName::new("A"), AgentName::new("B"), "hello".to_string())]),
        )
    }

    #[tokio::test]
    async fn basic_runner_delivers_unmodified_and_untraced() {
        let adapter = adapter_with_one_message();
        let runner = WorkflowRunner::basic(adapter);
        let result = runner.run("hi", &WorkflowOptions::default()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.messages[0].content, "hello");
        assert!(!result.metadata.contains_key("trace"));
    }

    #[tokio::test]
    async fn intercepting_runner_applies_registered_interceptions() {
        let adapter = adapter_with_one_message();
        let interception = MessageInterception::new("A", |c| format!("{c} [MOD]")).with_target("B");
        let runner = WorkflowRunner::intercepting(adapter, vec![interception]);

        let result = runner.run("hi", &WorkflowOptions::default()).await.unwrap();
        assert_eq!(result.messages[0].content, "hello [MOD]");
    }

    #[tokio::test]
    async fn empty_interception_list_is_bit_identical() {
        let adapter = adapter_with_one_message();
        let runner = WorkflowRunner::intercepting(adapter, vec![]);
        let result = runner.run("hi", &WorkflowOptions::default()).await.unwrap();
        assert_eq!(result.messages[0].content, "hello");
    }

    #[tokio::test]
    async fn monitored_runner_traces_and_streams_every_step() {
        let adapter = adapter_with_one_message();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_for_cb = Arc::clone(&seen);
        let callback: StreamCallback = Arc::new(move |step| seen_for_cb.lock().unwrap().push(step.clone()));

        let runner = WorkflowRunner::monitored(adapter, Some(callback));
        let result = runner.run("hi", &WorkflowOptions::default()).await.unwrap();

        assert!(result.metadata.contains_key("trace"));
        let logs = result.metadata.get("logs").unwrap().as_array().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(seen.lock().unwrap()[0].step_type, StepType::Receive);
    }

    #[tokio::test]
    async fn scenario_1_intercept_and_log() {
        let adapter = adapter_with_one_message();
        let interception = MessageInterception::new("A", |c| format!("{c} [MOD]")).with_target("B");
        let runner = WorkflowRunner::monitored_intercepting(adapter, vec![interception], None);

        let result = runner.run("hi", &WorkflowOptions::default()).await.unwrap();
        assert_eq!(result.messages[0].content, "hello [MOD]");

        let logs = result.metadata.get("logs").unwrap().as_array().unwrap();
        let intercept_steps: Vec<_> = logs.iter().filter(|s| s["step_type"] == "intercept").collect();
        assert_eq!(intercept_steps.len(), 1);
        assert_eq!(intercept_steps[0]["metadata"]["original"], "hello");
        assert_eq!(intercept_steps[0]["metadata"]["modified"], "hello [MOD]");
        assert_eq!(intercept_steps[0]["metadata"]["source"], "A");
        assert_eq!(intercept_steps[0]["metadata"]["target"], "B");

        let receive_steps: Vec<_> = logs.iter().filter(|s| s["step_type"] == "receive").collect();
        assert_eq!(receive_steps.len(), 1);
        assert_eq!(receive_steps[0]["content"], "hello [MOD]");
    }

    #[tokio::test]
    async fn hooks_are_removed_after_run_completes() {
        let adapter = adapter_with_one_message();
        let interception = MessageInterception::new("A", |c| format!("{c} [MOD]"));
        let runner = WorkflowRunner::intercepting(Arc::clone(&adapter), vec![interception]);
        runner.run("hi", &WorkflowOptions::default()).await.unwrap();

        // A fresh run against the same adapter, with no runner active, must
        // see unmodified content: the previous runner's hook is gone.
        let result = MASAdapter::run_workflow(adapter.as_ref(), "hi", &WorkflowOptions::default()).await.unwrap();
        assert_eq!(result.messages[0].content, "hello");
    }

    #[tokio::test]
    async fn workflow_failure_is_captured_not_propagated() {
        use masguard_hooks::HookError;

        let adapter = adapter_with_one_message();
        let runner = WorkflowRunner::basic(Arc::clone(&adapter));
        MASAdapter::register_hook(adapter.as_ref(), Arc::new(|_m: masguard_core::Message| Err(HookError::Failed("boom".into()))));

        let result = runner.run("hi", &WorkflowOptions::default()).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("boom"));
    }
}
