use serde_json::json;
use webdriver_wire::{Locate, Strategy, WebDriver};

/// Drives a locally running driver, e.g.
/// `geckodriver --port 4444` or `chromedriver --port=4444`.
pub fn main() -> webdriver_wire::Result<()> {
    let driver = WebDriver::new("http://localhost:4444")?;
    let session = driver.session(&json!({"browserName": "firefox"}))?;
    println!("session {} ({:?})", session.id(), session.dialect());

    session.go("https://www.w3.org/TR/webdriver2/")?;
    println!("title: {}", session.title()?);

    let heading = session.find_element((Strategy::CssSelector, "h1"))?;
    println!("heading: {}", heading.text()?);

    session.close()?;
    Ok(())
}
