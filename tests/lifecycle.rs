//! Mount/unmount and configuration through the public API

use std::time::Duration;

use slideframe::fullscreen::Fallback;
use slideframe::headless::{FullscreenSupport, HeadlessEvents, HeadlessViewport, ManualScheduler, ViewportCall};
use slideframe::platform::{EventKind, ViewportController};
use slideframe::{EmbedConfig, Error, SlidesWidget, ToggleOutcome};

fn widget(config: EmbedConfig) -> SlidesWidget<HeadlessViewport, ManualScheduler> {
    SlidesWidget::new(config, HeadlessViewport::new(FullscreenSupport::Unsupported), ManualScheduler::new())
        .expect("valid config")
}

#[test]
fn one_listener_per_event_while_mounted() {
    let events = HeadlessEvents::new();
    let mut w = widget(EmbedConfig::new("https://docs.google.com/presentation/d/abc/edit"));
    assert_eq!(events.total_listeners(), 0);

    w.mount(&events);
    for kind in EventKind::ALL {
        assert_eq!(events.listener_count(kind), 1, "{}", kind.dom_name());
    }

    w.unmount();
    assert!(!w.is_mounted());
    assert_eq!(events.total_listeners(), 0);
}

#[test]
fn unmount_leaves_simulated_fullscreen() {
    let events = HeadlessEvents::new();
    let mut w = widget(EmbedConfig::new("https://docs.google.com/presentation/d/abc/edit"));
    w.mount(&events);
    w.toggle_fullscreen();
    w.handle_event(EventKind::OrientationChange);
    assert!(w.is_fullscreen());

    w.unmount();
    assert!(!w.is_fullscreen());
    assert!(w.controller().viewport().root_style().is_empty());
    assert_eq!(w.controller().scheduler().pending(), 0);

    let before = w.controller().viewport().journal().len();
    w.controller_mut().advance(Duration::from_secs(1));
    assert_eq!(w.controller().viewport().journal().len(), before);
}

#[test]
fn dropping_widgets_releases_listeners() {
    let events = HeadlessEvents::new();
    {
        let mut a = widget(EmbedConfig::new("https://docs.google.com/presentation/d/a/edit"));
        let mut b = widget(EmbedConfig::new("https://docs.google.com/presentation/d/b/edit"));
        a.mount(&events);
        b.mount(&events);
        assert_eq!(events.listener_count(EventKind::Resize), 2);
    }
    assert_eq!(events.total_listeners(), 0);
}

#[test]
fn json_config_drives_widget() -> anyhow::Result<()> {
    let json = r#"{
        "url": "https://docs.google.com/presentation/d/e/2PACX-1vAbc-De_F2/pub",
        "class": "rounded",
        "attributes": { "data-testid": "deck" },
        "fullscreen": { "hide_chrome": false, "orientation_settle_ms": 500 }
    }"#;
    let config = EmbedConfig::from_json(json)?;
    assert_eq!(config.fullscreen.orientation_settle(), Duration::from_millis(500));
    assert_eq!(config.fullscreen.chrome_retry(), Duration::from_millis(100));

    let mut w = SlidesWidget::new(config, HeadlessViewport::new(FullscreenSupport::RejectSync), ManualScheduler::new())?;
    w.mount(&HeadlessEvents::new());
    w.toggle_fullscreen();
    w.handle_event(EventKind::OrientationChange);
    w.controller_mut().advance(Duration::from_millis(499));
    assert_eq!(w.controller().viewport().resize_count(), 0);
    w.controller_mut().advance(Duration::from_millis(1));
    assert_eq!(w.controller().viewport().resize_count(), 1);
    assert_eq!(w.controller().viewport().chrome_nudges(), 0);
    Ok(())
}

#[test]
fn invalid_configs_are_rejected() {
    assert!(matches!(EmbedConfig::from_json("{"), Err(Error::ConfigError(_))));
    assert!(matches!(EmbedConfig::from_json(r#"{"url": 3}"#), Err(Error::ConfigError(_))));

    let bad = EmbedConfig::new("https://docs.google.com/presentation/d/abc/edit").with_attribute("onclick", "x");
    let result = SlidesWidget::new(bad, HeadlessViewport::default(), ManualScheduler::new());
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn switching_urls_keeps_fullscreen_state() {
    let mut w = widget(EmbedConfig::new("https://docs.google.com/presentation/d/abc/edit"));
    w.toggle_fullscreen();
    assert!(w.set_url("https://docs.google.com/presentation/d/def/edit"));
    assert_eq!(w.embed_url(), "https://docs.google.com/presentation/d/def/embed?start=false&loop=false&delayms=3000");
    assert!(w.is_fullscreen());
}

#[test]
fn unrecognized_url_releases_simulated_fullscreen() {
    let mut w = widget(EmbedConfig::new("https://docs.google.com/presentation/d/abc/edit"));
    w.mount(&HeadlessEvents::new());
    w.toggle_fullscreen();
    w.handle_event(EventKind::OrientationChange);
    assert!(w.is_fullscreen());

    assert!(!w.set_url("https://example.com/not-a-slide"));
    assert!(matches!(w.view(), slideframe::View::Placeholder(_)));
    assert!(!w.is_fullscreen());
    assert!(w.controller().viewport().root_style().is_empty());
    assert_eq!(w.controller().scheduler().pending(), 0);

    // a recognized URL afterwards starts from a clean state
    assert!(w.set_url("https://docs.google.com/presentation/d/def/edit"));
    assert_eq!(w.toggle_fullscreen(), ToggleOutcome::EnteredSimulated(Fallback::Unsupported));
}

#[test]
fn unrecognized_url_exits_platform_fullscreen() {
    let mut w = SlidesWidget::new(
        EmbedConfig::new("https://docs.google.com/presentation/d/abc/edit"),
        HeadlessViewport::new(FullscreenSupport::Granted),
        ManualScheduler::new(),
    )
    .expect("valid config");
    w.mount(&HeadlessEvents::new());
    w.toggle_fullscreen();
    w.controller_mut().viewport_mut().settle();
    w.handle_event(EventKind::FullscreenChange);
    assert!(w.is_fullscreen());

    w.set_url("nope");
    assert_eq!(w.controller().viewport().journal().last(), Some(&ViewportCall::ExitFullscreen));
    w.controller_mut().viewport_mut().settle();
    w.handle_event(EventKind::FullscreenChange);
    assert!(!w.is_fullscreen());
}

#[test]
fn remount_after_url_change_restores_listeners() {
    let events = HeadlessEvents::new();
    let mut w = widget(EmbedConfig::new("https://docs.google.com/presentation/d/abc/edit"));
    w.mount(&events);
    w.unmount();

    w.set_url("https://docs.google.com/presentation/d/def/edit");
    assert!(!w.is_mounted());
    assert!(!w.handle_event(EventKind::Resize));

    w.mount(&events);
    w.mount(&events);
    assert_eq!(events.total_listeners(), EventKind::ALL.len());
    assert!(w.handle_event(EventKind::Resize));
}
