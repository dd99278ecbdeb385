//! Creation events and the notification content derived from them.
//!
//! A [`CreationEvent`] lives only as long as the notification attempt it
//! parameterizes. The deep link it carries is what a tap on the notification
//! routes to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Top-level screens a deep link can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Home,
    Explore,
    Mentor,
    Insights,
    Vision,
    Profile,
    About,
    Login,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Explore => "Explore",
            Screen::Mentor => "Mentor",
            Screen::Insights => "Insights",
            Screen::Vision => "Vision",
            Screen::Profile => "Profile",
            Screen::About => "About",
            Screen::Login => "Login",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown screen: {0}")]
pub struct UnknownScreen(pub String);

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Home" => Ok(Screen::Home),
            "Explore" => Ok(Screen::Explore),
            "Mentor" => Ok(Screen::Mentor),
            "Insights" => Ok(Screen::Insights),
            "Vision" => Ok(Screen::Vision),
            "Profile" => Ok(Screen::Profile),
            "About" => Ok(Screen::About),
            "Login" => Ok(Screen::Login),
            other => Err(UnknownScreen(other.to_string())),
        }
    }
}

/// Device platform, as reported with push-token registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
    #[default]
    Desktop,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
            Platform::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            "web" => Ok(Platform::Web),
            "desktop" => Ok(Platform::Desktop),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Navigation target carried in a notification's data payload.
///
/// `screen` stays a string on the wire; it is only checked when routed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeepLink {
    pub screen: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl DeepLink {
    pub fn new(screen: Screen, params: Value) -> Self {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            screen: screen.as_str().to_string(),
            params,
        }
    }

    /// Parse the deep link out of a notification data payload, if any.
    pub fn from_data(data: &Value) -> Option<Self> {
        let screen = data.get("screen")?.as_str()?.to_string();
        let params = data
            .get("params")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Some(Self { screen, params })
    }

    pub fn to_data(&self) -> Value {
        json!({ "screen": self.screen, "params": self.params })
    }
}

/// Title, body and deep link of a user-facing notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub link: DeepLink,
}

/// Something the user just created.
#[derive(Debug, Clone, PartialEq)]
pub enum CreationEvent {
    Prompt { id: i64, titulo: String },
    Task { id: i64, titulo: String },
    Evaluation { ia_id: Option<i64>, ia_nome: Option<String> },
}

impl CreationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            CreationEvent::Prompt { .. } => "prompt",
            CreationEvent::Task { .. } => "task",
            CreationEvent::Evaluation { .. } => "evaluation",
        }
    }

    pub fn content(&self) -> NotificationContent {
        match self {
            CreationEvent::Prompt { id, titulo } => NotificationContent {
                title: "Prompt created".into(),
                body: format!("“{titulo}” is ready to reuse."),
                link: DeepLink::new(
                    Screen::Explore,
                    json!({ "section": "prompts", "promptId": id }),
                ),
            },
            CreationEvent::Task { id, titulo } => NotificationContent {
                title: "Task created".into(),
                body: format!("“{titulo}” was added to your tasks."),
                link: DeepLink::new(
                    Screen::Explore,
                    json!({ "section": "tasks", "tarefaId": id }),
                ),
            },
            CreationEvent::Evaluation { ia_id, ia_nome } => {
                let name = ia_nome
                    .as_deref()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or("IA");
                NotificationContent {
                    title: "Evaluation saved".into(),
                    body: format!("Thanks for rating {name}."),
                    link: DeepLink::new(
                        Screen::Explore,
                        json!({ "section": "evaluations", "iaId": ia_id }),
                    ),
                }
            }
        }
    }
}
