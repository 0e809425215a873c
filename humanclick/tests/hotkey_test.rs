//! 切换键绑定与分发器测试

use humanclick_lib::hotkey::{
    DispatchAction, DispatchMode, InputEvent, KeyOrButtonId, ToggleDispatcher,
};

#[test]
fn test_binding_parse_and_label() {
    let key: KeyOrButtonId = "key:F6".parse().unwrap();
    assert_eq!(key, KeyOrButtonId::key("F6"));
    assert_eq!(key.label(), "Key F6");

    let button: KeyOrButtonId = "mouse:Middle".parse().unwrap();
    assert_eq!(button, KeyOrButtonId::button("Middle"));
    assert_eq!(button.label(), "Mouse Middle");

    assert!("F6".parse::<KeyOrButtonId>().is_err());
}

#[test]
fn test_key_and_button_with_same_name_differ() {
    let mut dispatcher = ToggleDispatcher::new();
    let binding = KeyOrButtonId::button("Left");

    assert_eq!(
        dispatcher.dispatch(&InputEvent::key_press("Left"), Some(&binding)),
        DispatchAction::Ignore
    );
    assert_eq!(
        dispatcher.dispatch(&InputEvent::button_press("Left"), Some(&binding)),
        DispatchAction::Toggle
    );
}

#[test]
fn test_recording_flow() {
    let mut dispatcher = ToggleDispatcher::new();
    let old = KeyOrButtonId::key("F6");

    assert!(dispatcher.request_recording());
    assert!(!dispatcher.request_recording());
    assert_eq!(dispatcher.mode(), DispatchMode::Recording);

    // 释放事件不会被捕获
    assert_eq!(
        dispatcher.dispatch(&InputEvent::key_release("K"), Some(&old)),
        DispatchAction::Ignore
    );

    // 录制模式下即使按下旧绑定也只会被捕获，不会切换
    assert_eq!(
        dispatcher.dispatch(&InputEvent::key_press("F6"), Some(&old)),
        DispatchAction::BindingCaptured(KeyOrButtonId::key("F6"))
    );
    assert_eq!(dispatcher.mode(), DispatchMode::Normal);
}

#[test]
fn test_no_binding_never_toggles() {
    let mut dispatcher = ToggleDispatcher::new();

    for event in [
        InputEvent::key_press("F6"),
        InputEvent::button_press("Middle"),
    ] {
        assert_eq!(dispatcher.dispatch(&event, None), DispatchAction::Ignore);
    }
}
