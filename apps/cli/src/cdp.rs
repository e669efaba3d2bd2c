//! Chromium-backed page capability

use async_trait::async_trait;
use chromiumoxide::page::Page;
use grabber::{AttributeWatch, GrabError, PlayerPage, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Sampling interval for attribute watches
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// [`PlayerPage`] over a live Chromium tab
///
/// Element access goes through evaluated JavaScript. An attribute watch is
/// a spawned polling task feeding the watch channel with changed values;
/// the task stops as soon as the consumer drops the watch.
pub struct CdpPlayerPage {
    page: Page,
}

impl CdpPlayerPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    async fn eval<T: DeserializeOwned>(&self, expression: String) -> Result<T> {
        let result = self
            .page
            .evaluate(expression)
            .await
            .map_err(|e| GrabError::Page(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| GrabError::Page(e.to_string()))
    }
}

/// Quote a string as a JavaScript literal
fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| GrabError::Page(e.to_string()))
}

#[async_trait]
impl PlayerPage for CdpPlayerPage {
    async fn element_count(&self, selector: &str) -> Result<usize> {
        let sel = js_string(selector)?;
        self.eval(format!("document.querySelectorAll({sel}).length"))
            .await
    }

    async fn click(&self, selector: &str, index: usize) -> Result<()> {
        let sel = js_string(selector)?;
        let clicked: bool = self
            .eval(format!(
                "(() => {{ const el = document.querySelectorAll({sel})[{index}]; \
                 if (!el) return false; el.click(); return true; }})()"
            ))
            .await?;
        if clicked {
            Ok(())
        } else {
            Err(GrabError::Page(format!(
                "no element at {}[{}]",
                selector, index
            )))
        }
    }

    async fn attribute(
        &self,
        selector: &str,
        index: usize,
        name: &str,
    ) -> Result<Option<String>> {
        let sel = js_string(selector)?;
        let attr = js_string(name)?;
        self.eval(format!(
            "(() => {{ const el = document.querySelectorAll({sel})[{index}]; \
             return el ? el.getAttribute({attr}) : null; }})()"
        ))
        .await
    }

    async fn watch_attribute(
        &self,
        selector: &str,
        index: usize,
        name: &str,
    ) -> Result<AttributeWatch> {
        let (tx, watch) = AttributeWatch::channel(8);
        let poller = CdpPlayerPage::new(self.page.clone());
        let selector = selector.to_string();
        let name = name.to_string();

        tokio::spawn(async move {
            // Only values that differ from the state at subscription time
            // are delivered.
            let mut last = poller.attribute(&selector, index, &name).await.ok().flatten();
            loop {
                if tx.is_closed() {
                    break;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
                let current = match poller.attribute(&selector, index, &name).await {
                    Ok(value) => value,
                    Err(e) => {
                        debug!("attribute poll on {} stopped: {}", selector, e);
                        break;
                    }
                };
                if current != last {
                    last = current.clone();
                    if let Some(value) = current {
                        if tx.send(value).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Ok(watch)
    }
}
