//! Built-in bootstrap scripts for GridFlow
//!
//! These are injected into the launch template as instance user data and run
//! once at first boot.

/// Web server bootstrap
/// Installs Apache, publishes a static page and enables the service
pub const WEB_SERVER_BOOTSTRAP: &str = r#"#!/bin/bash
yum update -y
yum install -y httpd
echo "<html><head><title>Hello, World!</title></head><body><h1>Hello, World!</h1></body></html>" > /var/www/html/index.html
systemctl start httpd
systemctl enable httpd
"#;
