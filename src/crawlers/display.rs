use crate::config::BrowserConfig;
use crate::error::{HuntError, Result};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};

/// Child process that is killed when the guard goes out of scope
#[derive(Debug)]
pub struct ChildGuard {
    name: String,
    child: Child,
}

impl ChildGuard {
    pub fn spawn(name: &str, command: &mut Command) -> Result<Self> {
        let child = command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HuntError::Io(std::io::Error::new(e.kind(), format!("{}: {}", name, e))))?;

        ::log::info!("Started {} (pid {})", name, child.id());
        Ok(Self {
            name: name.to_string(),
            child,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// True while the process has not exited
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            ::log::debug!("{} already stopped: {}", self.name, e);
        }
        let _ = self.child.wait();
        ::log::info!("Stopped {}", self.name);
    }
}

/// Xvfb server kept alive for the lifetime of the value
#[derive(Debug)]
pub struct VirtualDisplay {
    display: String,
    _process: ChildGuard,
}

impl VirtualDisplay {
    pub fn start(number: u32, size: &str) -> Result<Self> {
        let display = format!(":{}", number);
        let process = ChildGuard::spawn(
            "virtual display",
            Command::new("Xvfb").args(xvfb_args(&display, size)),
        )?;

        Ok(Self {
            display,
            _process: process,
        })
    }

    /// Value for the `DISPLAY` environment variable
    pub fn display(&self) -> &str {
        &self.display
    }
}

fn xvfb_args(display: &str, size: &str) -> Vec<String> {
    vec![
        display.to_string(),
        "-screen".to_string(),
        "0".to_string(),
        size.to_string(),
        "-nolisten".to_string(),
        "tcp".to_string(),
    ]
}

/// A chromedriver started for one mission
#[derive(Debug)]
pub struct DriverProcess {
    url: String,
    _process: ChildGuard,
}

impl DriverProcess {
    /// Launch chromedriver on a free local port, on `display` if given
    pub fn start(path: &str, display: Option<&str>) -> Result<Self> {
        let port = free_port()?;
        let mut command = Command::new(path);
        command.arg(format!("--port={}", port));
        if let Some(display) = display {
            command.env("DISPLAY", display);
        }

        let process = ChildGuard::spawn("chromedriver", &mut command)?;
        Ok(Self {
            url: format!("http://localhost:{}", port),
            _process: process,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn free_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// Processes backing one mission's browser, torn down in reverse start order
#[derive(Debug, Default)]
pub struct BrowserEnvironment {
    // Field order matters: the driver drops before the display
    driver: Option<DriverProcess>,
    display: Option<VirtualDisplay>,
}

impl BrowserEnvironment {
    pub fn start(config: &BrowserConfig) -> Result<Self> {
        let display = if config.virtual_display {
            Some(VirtualDisplay::start(
                config.display_number,
                &config.display_size,
            )?)
        } else {
            None
        };

        let driver = match &config.chromedriver_path {
            Some(path) => Some(DriverProcess::start(
                path,
                display.as_ref().map(|d| d.display()),
            )?),
            None => None,
        };

        Ok(Self { driver, display })
    }

    /// `DISPLAY` value of the virtual display, if one was started
    pub fn display(&self) -> Option<&str> {
        self.display.as_ref().map(|d| d.display())
    }

    /// WebDriver endpoint: the launched driver if any, else the configured one
    pub fn webdriver_url<'a>(&'a self, config: &'a BrowserConfig) -> &'a str {
        self.driver
            .as_ref()
            .map(|d| d.url())
            .unwrap_or(config.webdriver_url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xvfb_args() {
        let args = xvfb_args(":99", "1920x1080x24");
        assert_eq!(args, vec![":99", "-screen", "0", "1920x1080x24", "-nolisten", "tcp"]);
    }

    #[test]
    fn test_empty_environment_uses_configured_url() {
        let config = BrowserConfig::default();
        let env = BrowserEnvironment::start(&config).unwrap();
        assert_eq!(env.webdriver_url(&config), "http://localhost:4444");
    }

    #[test]
    fn test_free_port_is_nonzero() {
        assert!(free_port().unwrap() > 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_child_guard_stops_process() {
        let mut guard = ChildGuard::spawn("sleeper", Command::new("sleep").arg("30")).unwrap();
        assert!(guard.is_running());
        assert!(guard.id() > 0);
        drop(guard);
    }
}
