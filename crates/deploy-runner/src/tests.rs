/// End-to-end behaviour of the controller and its timer chain.
#[cfg(test)]
mod unit {
    use std::time::Duration;

    use launchpad_core::branches::StaticBranches;
    use launchpad_core::config::DeployConfig;
    use launchpad_core::env::EnvVar;
    use launchpad_core::types::{DeploymentStatus, RepoRef, SourceType, WizardStep};
    use launchpad_core::wizard::{DeploymentUpdate, ProjectDetailsUpdate};
    use launchpad_core::{LaunchpadError, WizardState};
    use tokio::sync::broadcast::error::RecvError;

    use crate::controller::INTERRUPTED;
    use crate::{script, DelayPolicy, DeployEvent, WizardController};

    fn policy(min_ms: u64, max_ms: u64) -> DelayPolicy {
        DelayPolicy::new(
            Duration::from_millis(min_ms),
            Duration::from_millis(max_ms),
            Duration::from_millis(min_ms),
        )
        .unwrap()
    }

    /// A wizard filled in through step 2 and sitting on the deploy step.
    fn ready(policy: DelayPolicy) -> WizardController {
        let wizard = WizardController::with_policy(Default::default(), policy, "launchpad.app");
        wizard.select_public_repo("https://github.com/acme/my-app");
        assert!(wizard.can_go_to_next_step());
        wizard.go_to_next_step();
        wizard.update_project_details(ProjectDetailsUpdate {
            project_name: Some("my-app".into()),
            ..Default::default()
        });
        assert!(wizard.can_go_to_next_step());
        wizard.go_to_next_step();
        assert_eq!(wizard.current_step(), WizardStep::Deploy);
        wizard
    }

    #[tokio::test(start_paused = true)]
    async fn deploy_requires_step_three() {
        let wizard = WizardController::new(&DeployConfig::default()).unwrap();
        assert!(matches!(
            wizard.start_deployment(),
            Err(LaunchpadError::NotReady(_))
        ));

        wizard.go_to_step(WizardStep::Deploy);
        // Still no project name.
        assert!(matches!(
            wizard.start_deployment(),
            Err(LaunchpadError::NotReady(_))
        ));
        assert_eq!(wizard.deployment_status(), DeploymentStatus::Idle);
    }

    #[test]
    fn deploy_outside_runtime_is_refused() {
        let wizard = ready(DelayPolicy::immediate());
        assert!(matches!(
            wizard.start_deployment(),
            Err(LaunchpadError::NotReady(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = DeployConfig {
            min_delay_ms: 10,
            max_delay_ms: 1,
            ..Default::default()
        };
        assert!(matches!(
            WizardController::new(&cfg),
            Err(LaunchpadError::InvalidConfig(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn start_clears_logs_before_first_line() {
        let wizard = ready(policy(20, 30));
        wizard.update_deployment(DeploymentUpdate {
            logs: Some(vec!["leftover".into()]),
            ..Default::default()
        });

        wizard.start_deployment().unwrap();

        let snap = wizard.snapshot();
        assert_eq!(snap.deployment.status, DeploymentStatus::Building);
        assert!(snap.deployment.logs.is_empty());
        assert!(snap.deployment.start_time.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_appends_script_in_order_then_succeeds() {
        let wizard = ready(policy(1, 3));
        let expected = script::lines(&wizard.snapshot(), "launchpad.app");
        let mut events = wizard.subscribe();

        let run = wizard.start_deployment().unwrap();
        assert_eq!(wizard.wait().await, DeploymentStatus::Success);

        let snap = wizard.snapshot();
        assert_eq!(snap.deployment.logs, expected);
        let url = snap.deployment.deployed_url.unwrap();
        assert!(url.ends_with("my-app.launchpad.app"), "{url}");
        assert!(snap.deployment.end_time.is_some());
        assert!(snap.deployment.error.is_none());

        let mut streamed = Vec::new();
        loop {
            match events.recv().await.unwrap() {
                DeployEvent::Started { run: r } => assert_eq!(r, run),
                DeployEvent::Log { run: r, line } => {
                    assert_eq!(r, run);
                    streamed.push(line);
                }
                DeployEvent::Finished { status, .. } => {
                    assert_eq!(status, DeploymentStatus::Success);
                    break;
                }
            }
        }
        assert_eq!(streamed, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_supersedes_previous_run() {
        let wizard = ready(policy(2, 4));
        let first = wizard.start_deployment().unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = wizard.start_deployment().unwrap();
        assert!(second > first);

        assert_eq!(wizard.wait().await, DeploymentStatus::Success);
        let expected = script::lines(&wizard.snapshot(), "launchpad.app");
        assert_eq!(wizard.logs(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_the_timer_chain() {
        let wizard = ready(policy(5, 10));
        wizard.start_deployment().unwrap();
        tokio::time::sleep(Duration::from_millis(12)).await;

        wizard.reset_wizard();
        tokio::time::sleep(Duration::from_millis(200)).await;

        let snap = wizard.snapshot();
        assert_eq!(snap.current_step, WizardStep::Source);
        assert_eq!(snap.deployment.status, DeploymentStatus::Idle);
        assert!(snap.deployment.logs.is_empty());
        assert!(snap.project_details.project_name.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_aborts_the_run() {
        let wizard = ready(policy(5, 10));
        let mut events = wizard.subscribe();
        wizard.start_deployment().unwrap();
        drop(wizard);

        loop {
            match events.recv().await {
                Ok(event) => assert!(!event.is_finished(), "run finished after teardown"),
                Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(_)) => continue,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_only_set_by_caller_and_retry_restarts() {
        let wizard = ready(policy(5, 10));
        wizard.start_deployment().unwrap();
        tokio::time::sleep(Duration::from_millis(15)).await;

        wizard.mark_failed("registry unreachable");
        assert_eq!(wizard.wait().await, DeploymentStatus::Failed);
        let failed = wizard.snapshot();
        assert_eq!(failed.deployment.error.as_deref(), Some("registry unreachable"));

        // The superseded chain must not touch the failed record.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(wizard.snapshot().deployment, failed.deployment);

        wizard.retry_deployment().unwrap();
        let snap = wizard.snapshot();
        assert_eq!(snap.deployment.status, DeploymentStatus::Building);
        assert!(snap.deployment.error.is_none());
        assert!(snap.deployment.logs.is_empty());
        assert!(snap.deployment.end_time.is_none());

        assert_eq!(wizard.wait().await, DeploymentStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_requires_failed_status() {
        let wizard = ready(DelayPolicy::immediate());
        assert!(matches!(
            wizard.retry_deployment(),
            Err(LaunchpadError::InvalidTransition { .. })
        ));

        wizard.start_deployment().unwrap();
        wizard.wait().await;
        assert!(matches!(
            wizard.retry_deployment(),
            Err(LaunchpadError::InvalidTransition { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn direct_status_update_detaches_run() {
        let wizard = ready(policy(5, 10));
        wizard.start_deployment().unwrap();
        wizard.update_deployment(DeploymentUpdate {
            status: Some(DeploymentStatus::Failed),
            error: Some(Some("health check failed".into())),
            ..Default::default()
        });
        tokio::time::sleep(Duration::from_millis(200)).await;

        let snap = wizard.snapshot();
        assert_eq!(snap.deployment.status, DeploymentStatus::Failed);
        assert!(snap.deployment.logs.is_empty());
        assert!(wizard.retry_deployment().is_ok());
    }

    #[test]
    fn github_selection_moves_branch() {
        let wizard = WizardController::new(&DeployConfig::default()).unwrap();
        let source = StaticBranches::new().with_repo(
            "acme/web",
            vec!["trunk".to_string(), "release".to_string()],
        );

        let branches = wizard
            .select_github_repo(RepoRef::new("acme", "web").with_default_branch("trunk"), &source)
            .unwrap();
        assert_eq!(branches, vec!["trunk", "release"]);

        let snap = wizard.snapshot();
        assert_eq!(snap.source_code.source_type, Some(SourceType::Github));
        assert!(snap.source_code.public_repo_url.is_none());
        assert_eq!(snap.project_details.branch, "trunk");
        assert!(wizard.can_go_to_next_step());

        wizard.clear_source();
        assert!(!wizard.can_go_to_next_step());
    }

    #[test]
    fn env_editing_through_controller() {
        let wizard = WizardController::new(&DeployConfig::default()).unwrap();
        wizard.import_from_env("A=1\n# comment\n\nB=two=words\n");
        assert_eq!(
            wizard.env_vars(),
            vec![EnvVar::new("A", "1"), EnvVar::new("B", "two=words")]
        );

        wizard.add_environment_variable();
        wizard.update_environment_variable(2, "C", "3");
        wizard.remove_environment_variable(0);
        assert_eq!(wizard.export_to_env(), "B=two=words\nC=3\n");
        assert!(wizard.validate_current_step().errors().len() == 1);
    }

    #[tokio::test(start_paused = true)]
    async fn resumed_building_draft_is_interrupted() {
        let mut saved = WizardState::new();
        saved.go_to_step(WizardStep::Deploy);
        saved.update_project_details(ProjectDetailsUpdate {
            project_name: Some("my-app".into()),
            ..Default::default()
        });
        saved.update_deployment(DeploymentUpdate {
            status: Some(DeploymentStatus::Building),
            logs: Some(vec!["Initializing build environment...".into()]),
            ..Default::default()
        });

        let wizard = WizardController::with_state(saved, &DeployConfig::default()).unwrap();
        let resolved = tokio::time::timeout(Duration::from_millis(300), wizard.wait()).await;
        assert_eq!(resolved, Ok(DeploymentStatus::Failed));
        assert_eq!(
            wizard.snapshot().deployment.error.as_deref(),
            Some(INTERRUPTED)
        );

        wizard.retry_deployment().unwrap();
        assert_eq!(wizard.wait().await, DeploymentStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_without_a_run_returns_current_status() {
        let wizard = ready(policy(1, 2));
        wizard.update_deployment(DeploymentUpdate {
            status: Some(DeploymentStatus::Building),
            ..Default::default()
        });
        let resolved = tokio::time::timeout(Duration::from_millis(300), wizard.wait()).await;
        assert_eq!(resolved, Ok(DeploymentStatus::Building));
    }
}
