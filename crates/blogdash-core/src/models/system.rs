use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSetting {
    pub id: i64,
    pub key: String,
    pub value: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_editable: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl SystemSetting {
    /// Mail settings are edited as a group rather than one key at a time.
    pub fn is_mail_setting(&self) -> bool {
        self.key.starts_with("MAIL_")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSettings {
    pub mail_username: String,
    pub mail_password: String,
    pub mail_from: String,
    pub mail_server: String,
    pub mail_port: u16,
    pub mail_tls: bool,
    pub mail_ssl: bool,
    pub mail_use_credentials: bool,
    pub mail_validate_certs: bool,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            mail_username: String::new(),
            mail_password: String::new(),
            mail_from: String::new(),
            mail_server: String::new(),
            mail_port: 465,
            mail_tls: false,
            mail_ssl: true,
            mail_use_credentials: true,
            mail_validate_certs: true,
        }
    }
}
