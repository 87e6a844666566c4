//! SMTP delivery through `lettre`.
//!
//! With `secure` set the connection is TLS from the first byte (usually port 465).
//! Otherwise it starts in plain text and upgrades with STARTTLS whenever the server
//! offers it (usually port 587). AUTH is used only when both user and password are
//! configured. Every socket operation is bounded by `timeout`.
use std::time::Duration;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use log::debug;

use crate::notifier::{NotifyError, Notifier};

/// Default socket timeout for every SMTP exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings of the mail server.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpOptions {
    /// Mail server host name.
    pub host: String,
    /// Mail server port.
    pub port: u16,
    /// Implicit TLS instead of opportunistic STARTTLS.
    pub secure: bool,
    /// AUTH user name.
    pub user: Option<String>,
    /// AUTH password.
    pub password: Option<String>,
    /// Socket timeout.
    pub timeout: Duration,
}

impl SmtpOptions {
    /// Plain connection to `host:port` without credentials.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: String::from(host),
            port,
            secure: false,
            user: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Credentials when both halves are configured.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some(Credentials::new(user.clone(), password.clone())),
            _ => None,
        }
    }
}

/// `Notifier` that sends plain-text mail through an SMTP server.
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
    server: String,
}

impl SmtpNotifier {
    /// Build the transport for `options`, sending as `from`.
    pub fn new(options: &SmtpOptions, from: &str) -> Result<Self, NotifyError> {
        let from = from.parse::<Mailbox>()?;
        let tls_parameters = TlsParameters::new(options.host.clone())?;
        let tls = if options.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let mut builder = SmtpTransport::builder_dangerous(options.host.as_str())
            .port(options.port)
            .tls(tls)
            .timeout(Some(options.timeout));
        if let Some(credentials) = options.credentials() {
            builder = builder.credentials(credentials);
        }

        Ok(Self {
            transport: builder.build(),
            from,
            server: format!("{}:{}", options.host, options.port),
        })
    }
}

impl Notifier for SmtpNotifier {
    fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if subject.contains(['\r', '\n']) {
            return Err(NotifyError::InvalidHeader("subject"));
        }
        let message = Message::builder()
            .from(self.from.clone())
            .to(address.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(String::from(body))?;

        self.transport.send(&message)?;
        debug!("Mail to {} accepted by {}", address, self.server);
        Ok(())
    }
}
