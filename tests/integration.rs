//! Integration tests for actuate
//!
//! Browser tests require Chrome to be installed and available.
//! Run them with: cargo test --test integration -- --ignored

use actuate::recorder::{ElementInfo, InteractionEvent};
use actuate::runner::{run_batch, Fault, MemoryElement, MemoryHost};
use actuate::{run_all, Config, Descriptor, Recorder};
use eoka::Browser;
use std::sync::{Arc, Mutex};

/// Check if Chrome is available
fn chrome_available() -> bool {
    eoka::stealth::patcher::find_chrome().is_ok()
}

const FORM_PAGE: &str = r##"data:text/html,
    <h1 id="title">Checkout</h1>
    <button id="a" onclick="this.dataset.clicked = 'yes'">Buy</button>
    <input type="text" id="b" value="old">
"##;

#[tokio::test(start_paused = true)]
async fn test_recorded_yaml_replays_from_config() {
    let mut recorder = Recorder::new();
    recorder.start();
    recorder.observe(&InteractionEvent::click(ElementInfo::with_id("record")));
    recorder.observe(&InteractionEvent::focus(ElementInfo::with_id("email")));
    recorder.observe(&InteractionEvent::change(
        ElementInfo::with_id("email"),
        "ada@example.com",
    ));
    recorder.observe(&InteractionEvent::click(ElementInfo::with_id("submit")));
    recorder.stop();

    let yaml = recorder.to_yaml().expect("Failed to export");
    let config = Config::parse(&yaml).expect("Failed to parse recording");
    assert_eq!(config.actions.len(), 3);

    let host = MemoryHost::new()
        .with_element("#email", MemoryElement::new())
        .with_element("#submit", MemoryElement::new());
    host.fail_next("#submit", 2);

    let summary = run_batch(&host, &config.actions).await;
    assert_eq!(summary.results, vec![true, true, true]);
    assert!(summary.success);

    let email = host.element("#email").unwrap();
    assert_eq!(email.value, "ada@example.com");
    assert!(email.focused);
    // two scripted faults, then the third and last allowed attempt succeeds
    assert_eq!(host.invocation_count("#submit"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_observer_sees_faults_but_not_missing_elements() {
    let host = MemoryHost::new().with_element("#flaky", MemoryElement::new());
    host.fail_always("#flaky");

    let faults: Arc<Mutex<Vec<Fault>>> = Arc::default();
    let sink = faults.clone();
    let missing_calls = Arc::new(Mutex::new(0u32));
    let missing_sink = missing_calls.clone();

    let batch = vec![
        Descriptor::new("#flaky", "activate")
            .max_retries(1)
            .on_attempt_error(move |f| sink.lock().unwrap().push(f.clone())),
        Descriptor::new("#never", "activate")
            .max_retries(1)
            .on_attempt_error(move |_| *missing_sink.lock().unwrap() += 1),
    ];

    // both fail, only the observer tells them apart
    assert_eq!(run_all(&host, &batch).await, vec![false, false]);
    assert_eq!(faults.lock().unwrap().len(), 2);
    assert_eq!(*missing_calls.lock().unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_browser_mixed_batch() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let browser = Browser::launch().await.expect("Failed to launch browser");
    let page = browser
        .new_page("about:blank")
        .await
        .expect("Failed to create page");
    page.goto(FORM_PAGE).await.expect("Failed to navigate");

    let batch = vec![
        Descriptor::new("#a", "activate"),
        Descriptor::new("#missing", "focus"),
        Descriptor::new("#b", "set_value").value("x"),
    ];
    assert_eq!(run_all(&page, &batch).await, vec![true, false, true]);

    let value: String = page
        .evaluate("document.querySelector('#b').value")
        .await
        .expect("Failed to read value");
    assert_eq!(value, "x");
    let clicked: Option<String> = page
        .evaluate("document.querySelector('#a').dataset.clicked ?? null")
        .await
        .expect("Failed to read dataset");
    assert_eq!(clicked.as_deref(), Some("yes"));

    browser.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_browser_focus_and_read_text() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let browser = Browser::launch().await.expect("Failed to launch browser");
    let page = browser
        .new_page("about:blank")
        .await
        .expect("Failed to create page");
    page.goto(FORM_PAGE).await.expect("Failed to navigate");

    let batch = vec![
        Descriptor::new("#b", "focus"),
        Descriptor::new("#title", "read_text"),
        Descriptor::new("#b", "set_value"),
    ];
    assert_eq!(run_all(&page, &batch).await, vec![true, true, true]);

    let focused: String = page
        .evaluate("document.activeElement?.id ?? ''")
        .await
        .expect("Failed to read focus");
    assert_eq!(focused, "b");
    let value: String = page
        .evaluate("document.querySelector('#b').value")
        .await
        .expect("Failed to read value");
    assert_eq!(value, "");
    let title: String = page
        .evaluate("document.querySelector('#title').textContent")
        .await
        .expect("Failed to read title");
    assert_eq!(title, "Checkout");

    browser.close().await.expect("Failed to close browser");
}
