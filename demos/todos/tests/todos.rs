use flux_dispatch::logger::{ActionLogConfig, ActionLoggerMiddleware};
use flux_dispatch::testing::ListenerProbe;
use flux_dispatch::StoreError;
use serde_json::json;
use todos_demo::{
    app_state, create_app_store, parse_script, render, run_commands, Command, DemoError,
    TodoCommands, VisibilityFilter,
};

fn quiet_logger() -> ActionLoggerMiddleware {
    ActionLoggerMiddleware::with_default_log().active(false)
}

#[test]
fn test_redux_tutorial_script() {
    let script = "\
# the basics tutorial, end to end
add Learn about actions
add Learn about reducers
add Learn about store
toggle 0
toggle 1
filter completed
";
    let commands = parse_script(script).unwrap();
    let store = create_app_store(None, quiet_logger()).unwrap();
    let mut creators = TodoCommands::new();

    run_commands(&store, &mut creators, &commands).unwrap();

    let state = app_state(&store).unwrap();
    assert_eq!(state.todos.len(), 3);
    assert_eq!(state.visibility_filter, VisibilityFilter::ShowCompleted);
    assert_eq!(
        render(&state),
        "[x] 0 Learn about actions\n[x] 1 Learn about reducers\nfilter: SHOW_COMPLETED\ncounter: 0\n"
    );
}

#[test]
fn test_counter_commands() {
    let store = create_app_store(None, quiet_logger()).unwrap();
    let mut creators = TodoCommands::new();

    run_commands(
        &store,
        &mut creators,
        &[Command::Increment, Command::Increment, Command::Decrement],
    )
    .unwrap();

    assert_eq!(store.get_state()["counter"], json!(1));
}

#[test]
fn test_state_tree_shape() {
    let store = create_app_store(None, quiet_logger()).unwrap();
    let mut creators = TodoCommands::new();
    run_commands(&store, &mut creators, &[Command::Add("Learn Redux".into())]).unwrap();

    assert_eq!(
        *store.get_state(),
        json!({
            "todos": [{ "id": 0, "text": "Learn Redux", "completed": false }],
            "visibilityFilter": "SHOW_ALL",
            "counter": 0
        })
    );
}

#[test]
fn test_preloaded_state_continues_ids() {
    let preloaded = json!({
        "todos": [{ "id": 4, "text": "Saved earlier", "completed": true }],
        "visibilityFilter": "SHOW_ACTIVE",
        "counter": 7
    });
    let store = create_app_store(Some(preloaded), quiet_logger()).unwrap();
    let mut creators = TodoCommands::starting_at(5);

    run_commands(&store, &mut creators, &[Command::Add("New".into())]).unwrap();

    let state = app_state(&store).unwrap();
    assert_eq!(state.counter, 7);
    assert_eq!(state.todos.iter().map(|t| t.id).collect::<Vec<_>>(), vec![4, 5]);
    assert_eq!(render(&state), "[ ] 5 New\nfilter: SHOW_ACTIVE\ncounter: 7\n");
}

#[test]
fn test_listener_runs_once_per_command() {
    let store = create_app_store(None, quiet_logger()).unwrap();
    let probe = ListenerProbe::new();
    let _subscription = store.subscribe(probe.listener("render"));
    let mut creators = TodoCommands::new();

    let commands = parse_script("add a\nadd b\ntoggle 1\ninc").unwrap();
    run_commands(&store, &mut creators, &commands).unwrap();

    assert_eq!(probe.count("render"), 4);
}

#[test]
fn test_action_log_when_active() {
    let logger = ActionLoggerMiddleware::with_log(ActionLogConfig::default());
    let store = create_app_store(None, logger).unwrap();
    let mut creators = TodoCommands::new();

    let commands = parse_script("add a\ntoggle 9\ninc").unwrap();
    run_commands(&store, &mut creators, &commands).unwrap();

    let entries: Vec<(String, Option<bool>)> = store.middleware(|m| {
        m.log()
            .unwrap()
            .entries()
            .map(|e| (e.name.clone(), e.state_changed))
            .collect()
    });
    assert_eq!(
        entries,
        vec![
            ("ADD_TODO".to_string(), Some(true)),
            ("TOGGLE_TODO".to_string(), Some(false)),
            ("INCREMENT".to_string(), Some(true)),
        ]
    );
}

#[test]
fn test_script_error_reports_line() {
    let err = parse_script("add a\nfilter someday\n").unwrap_err();
    assert_eq!(err.0, 2);

    let err = DemoError::from(err);
    assert_eq!(
        err.to_string(),
        "line 2: invalid argument for `filter`: unknown filter `someday` (expected all, active or completed)"
    );
}

#[test]
fn test_malformed_preloaded_state_is_rejected() {
    let result = create_app_store(Some(json!({ "todos": "oops" })), quiet_logger());
    assert!(matches!(result, Err(StoreError::SliceCodec { ref key, .. }) if key == "todos"));
}
