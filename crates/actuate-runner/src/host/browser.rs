//! [`Host`] over a live `eoka` page. Locators are CSS selectors.

use super::{ElementHandle, Fault, Host};
use async_trait::async_trait;
use eoka::Page;
use tracing::debug;

/// Quote a string as a JavaScript literal.
fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn exists_js(selector: &str) -> String {
    format!("!!document.querySelector({})", js_str(selector))
}

fn focus_js(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector({});
            if (!el) return false;
            el.focus();
            return true;
        }})()"#,
        js_str(selector)
    )
}

fn read_text_js(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector({});
            if (!el) return null;
            return (el.innerText ?? el.textContent ?? '').trim();
        }})()"#,
        js_str(selector)
    )
}

fn detached(element: &ElementHandle) -> Fault {
    Fault::Detached {
        locator: element.as_str().to_string(),
    }
}

#[async_trait(?Send)]
impl Host for Page {
    async fn resolve(&self, locator: &str) -> Option<ElementHandle> {
        let found: eoka::Result<bool> = self.evaluate(&exists_js(locator)).await;
        match found {
            Ok(true) => Some(ElementHandle::new(locator)),
            Ok(false) => None,
            Err(e) => {
                // invalid selectors throw inside querySelector
                debug!("resolve '{}' failed: {}", locator, e);
                None
            }
        }
    }

    async fn activate(&self, element: &ElementHandle) -> Result<(), Fault> {
        self.click(element.as_str()).await?;
        Ok(())
    }

    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<(), Fault> {
        self.fill(element.as_str(), value).await?;
        Ok(())
    }

    async fn focus(&self, element: &ElementHandle) -> Result<(), Fault> {
        let focused: bool = self.evaluate(&focus_js(element.as_str())).await?;
        if focused {
            Ok(())
        } else {
            Err(detached(element))
        }
    }

    async fn read_text(&self, element: &ElementHandle) -> Result<String, Fault> {
        let text: Option<String> = self.evaluate(&read_text_js(element.as_str())).await?;
        text.ok_or_else(|| detached(element))
    }
}
