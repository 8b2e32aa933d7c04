//! Server startup utilities.

use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    ______ _       __                  __
   / ____/(_)___  / /__________ ______/ /__
  / /_   / / __ \/ __/ ___/ __ `/ ___/ //_/
 / __/  / / / / / /_/ /  / /_/ / /__/ ,<
/_/    /_/_/ /_/\__/_/   \__,_/\___/_/|_|

              Personal Finance API
    "#
    );
}

/// Prints server startup information.
pub fn print_startup_info(port: u16) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:    http://0.0.0.0:{}/api/v1", port);
    info!("Health:      http://0.0.0.0:{}/health", port);
    info!("Swagger UI:  http://0.0.0.0:{}/swagger-ui", port);
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info(8000);
    }

    #[test]
    fn test_print_startup_info_custom_port() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info(3000);
    }
}
