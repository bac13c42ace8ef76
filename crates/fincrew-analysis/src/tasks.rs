//! To-do-list tracking via browser automation
//!
//! Drives the to-do web app through a WebDriver session: log in, open the
//! tracking list, add a task with the given name, submit. Steps are
//! separated by fixed sleeps, not readiness polling; on a slow page a
//! step can still find an element before it is interactable.

use crate::config::TrackerConfig;
use crate::error::{AnalysisError, Result};
use fantoccini::{Client, ClientBuilder, Locator};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

const LOGIN_URL: &str = "https://todoist.com/users/showlogin";
const EMAIL_INPUT: &str = "input#element-0";
const PASSWORD_INPUT: &str = "input#element-2";
const TASK_NAME_INPUT: &str = "p[data-placeholder='Task name']";
const SUBMIT_BUTTON: &str = "button[data-testid='task-editor-submit-button']";

/// WebDriver Enter key
const ENTER_KEY: &str = "\u{e007}";

const PAGE_SETTLE: Duration = Duration::from_secs(3);
const LOGIN_SETTLE: Duration = Duration::from_secs(5);
const CLICK_SETTLE: Duration = Duration::from_secs(2);

fn xpath_for_label(element: &str, label: &str) -> String {
    format!("//{element}[contains(text(), '{label}')]")
}

async fn connect(config: &TrackerConfig) -> Result<Client> {
    ClientBuilder::native()
        .connect(&config.webdriver_url)
        .await
        .map_err(|e| AnalysisError::Browser(format!("WebDriver connect failed: {e}")))
}

/// Add a task to the tracking list
pub async fn add_tracked_task(config: &TrackerConfig, task_name: &str) -> Result<()> {
    let client = connect(config).await?;
    let result = run_flow(&client, config, task_name).await;

    // Close the session regardless of how the flow ended
    let close_result = client.close().await;
    result?;
    close_result.map_err(|e| AnalysisError::Browser(e.to_string()))?;

    info!("task '{task_name}' added to list '{}'", config.list_name);
    Ok(())
}

async fn run_flow(client: &Client, config: &TrackerConfig, task_name: &str) -> Result<()> {
    let browser = |e: fantoccini::error::CmdError| AnalysisError::Browser(e.to_string());

    info!("opening login page");
    client.goto(LOGIN_URL).await.map_err(browser)?;
    sleep(PAGE_SETTLE).await;

    client
        .find(Locator::Css(EMAIL_INPUT))
        .await
        .map_err(browser)?
        .send_keys(&config.email)
        .await
        .map_err(browser)?;
    let password_field = client
        .find(Locator::Css(PASSWORD_INPUT))
        .await
        .map_err(browser)?;
    password_field
        .send_keys(&config.password)
        .await
        .map_err(browser)?;
    password_field.send_keys(ENTER_KEY).await.map_err(browser)?;
    sleep(LOGIN_SETTLE).await;
    info!("logged in");

    let list_locator = xpath_for_label("span", &config.list_name);
    client
        .find(Locator::XPath(&list_locator))
        .await
        .map_err(browser)?
        .click()
        .await
        .map_err(browser)?;
    sleep(CLICK_SETTLE).await;

    let add_task_locator = xpath_for_label("button[@aria-disabled='false']//span", "Add task");
    client
        .find(Locator::XPath(&add_task_locator))
        .await
        .map_err(browser)?
        .click()
        .await
        .map_err(browser)?;
    sleep(CLICK_SETTLE).await;

    client
        .find(Locator::Css(TASK_NAME_INPUT))
        .await
        .map_err(browser)?
        .send_keys(task_name)
        .await
        .map_err(browser)?;
    info!("task name entered");

    client
        .find(Locator::Css(SUBMIT_BUTTON))
        .await
        .map_err(browser)?
        .click()
        .await
        .map_err(browser)?;
    sleep(PAGE_SETTLE).await;
    info!("task submitted");

    Ok(())
}
