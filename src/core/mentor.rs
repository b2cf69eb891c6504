//! Rule-based mentor chat.
//!
//! Replies come from a fixed keyword table; the first matching topic wins and
//! anything else gets a generic answer. The request handler mirrors the JSON
//! contract of the hosted chat endpoint.
use crate::core::aggregator::completed_module_count;
use crate::core::config::Profile;
use crate::core::math::{round_half_up, safe_percent};
use crate::core::records::Snapshot;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

const DEFAULT_NAME: &str = "entrepreneur";
const DEFAULT_BUSINESS: &str = "your business";
const DEFAULT_BUSINESS_TYPE: &str = "business";

/// What the mentor knows about the person it is talking to.
#[derive(Debug, Clone, PartialEq)]
pub struct MentorContext {
    pub name: String,
    pub business: String,
    pub business_type: String,
    pub completed_modules: usize,
    pub total_modules: usize,
    pub has_recent_metrics: bool,
}

impl Default for MentorContext {
    fn default() -> Self {
        MentorContext {
            name: DEFAULT_NAME.to_string(),
            business: DEFAULT_BUSINESS.to_string(),
            business_type: DEFAULT_BUSINESS_TYPE.to_string(),
            completed_modules: 0,
            total_modules: 0,
            has_recent_metrics: false,
        }
    }
}

impl MentorContext {
    pub fn from_snapshot(profile: &Profile, snapshot: &Snapshot) -> Self {
        let pick = |value: &Option<String>, fallback: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        MentorContext {
            name: pick(&profile.display_name, DEFAULT_NAME),
            business: pick(&profile.business_name, DEFAULT_BUSINESS),
            business_type: pick(&profile.business_type, DEFAULT_BUSINESS_TYPE),
            completed_modules: completed_module_count(snapshot.progress(), snapshot.modules()),
            total_modules: snapshot.modules().len(),
            has_recent_metrics: snapshot.has_history(),
        }
    }

    fn progress_percent(&self) -> i64 {
        round_half_up(safe_percent(
            self.completed_modules as f64,
            self.total_modules as f64,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Greeting,
    Progress,
    WhatsApp,
    Pricing,
    Marketing,
    Finance,
    DigitalTools,
    Help,
}

/// Keywords per topic, checked in this order.
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Greeting, &["hello", "hi", "hey", "hola", "buenos", "buenas"]),
    (
        Topic::Progress,
        &["progress", "progreso", "como voy", "how am i doing"],
    ),
    (Topic::WhatsApp, &["whatsapp", "catalog", "catalogo"]),
    (Topic::Pricing, &["price", "pricing", "precio", "cost", "costo"]),
    (
        Topic::Marketing,
        &["marketing", "mercadeo", "customer", "clientes", "sales", "ventas"],
    ),
    (
        Topic::Finance,
        &["money", "dinero", "finance", "finanza", "budget", "presupuesto"],
    ),
    (
        Topic::DigitalTools,
        &["tools", "herramientas", "digital", "app", "apps"],
    ),
    (Topic::Help, &["help", "ayuda", "advice", "consejo"]),
];

/// Lowercases, folds common Spanish accents and splits on anything that is
/// not a letter or digit.
fn tokenize(message: &str) -> Vec<String> {
    let folded: String = message
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect();
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn keyword_matches(tokens: &[String], keyword: &str) -> bool {
    let parts: Vec<&str> = keyword.split(' ').collect();
    if parts.len() > 1 {
        return tokens
            .windows(parts.len())
            .any(|w| w.iter().zip(&parts).all(|(t, p)| t.as_str() == *p));
    }
    tokens
        .iter()
        .any(|t| t == keyword || (keyword.len() >= 4 && t.starts_with(keyword)))
}

pub fn classify(message: &str) -> Option<Topic> {
    let tokens = tokenize(message);
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| keyword_matches(&tokens, k)))
        .map(|(topic, _)| *topic)
}

pub fn reply(message: &str, context: &MentorContext) -> String {
    let topic = classify(message);
    debug!("Mentor topic for {message:?}: {topic:?}");
    let MentorContext {
        name,
        business,
        business_type,
        ..
    } = context;

    match topic {
        Some(Topic::Greeting) => format!(
            "Hi {name}! 👋 I'm your digital mentor for entrepreneurs. How can I help {business} grow today?"
        ),
        Some(Topic::Progress) => {
            let percent = context.progress_percent();
            let cheer = if percent > 50 {
                "You're doing fantastic! 🎉"
            } else {
                "Keep going, you're building momentum! 💪"
            };
            format!(
                "Great question! You have completed {} of {} learning modules ({percent}%). {cheer}",
                context.completed_modules, context.total_modules
            )
        }
        Some(Topic::WhatsApp) => format!(
            "For a {business_type} like yours, WhatsApp Business is crucial! 📱 My best tips:\n\n\
             1. Fill in your business profile completely\n\
             2. Build a catalog with high-quality photos\n\
             3. Use quick replies for common questions\n\
             4. Post status updates regularly\n\
             5. Organise your contacts with labels\n\n\
             Want me to walk you through any of these steps?"
        ),
        Some(Topic::Pricing) => format!(
            "Pricing strategy is key for {business}! 💰 A simple formula:\n\n\
             Cost + Desired Profit + Market Value = Your Price\n\n\
             For a {business_type}, research competitors and consider:\n\
             • Your unique value\n\
             • What customers are willing to pay\n\
             • Seasonal demand\n\
             • Hidden costs\n\n\
             Need help working out specific prices?"
        ),
        Some(Topic::Marketing) => format!(
            "Let's boost the visibility of {business}! 📈 For a {business_type}, try:\n\n\
             • Social media posts 3x a week\n\
             • Customer testimonials\n\
             • Local community involvement\n\
             • Referral incentives\n\
             • An optimised Google Business profile\n\
             • Daily Instagram stories\n\n\
             Which area interests you most?"
        ),
        Some(Topic::Finance) => {
            let opener = if context.has_recent_metrics {
                "Based on your recent numbers, let's tune your finances! 📊"
            } else {
                "Let's get your finances organised! 📊"
            };
            format!(
                "{opener}\n\nKey areas to focus on:\n\
                 • Record income and expenses daily\n\
                 • Keep business and personal money apart\n\
                 • Plan for slow months\n\
                 • Reinvest 15-20% in growth\n\
                 • Build an emergency fund\n\n\
                 Want help with budgeting or expense tracking?"
            )
        }
        Some(Topic::DigitalTools) => format!(
            "Digital tools can transform {business}! 🔧 I recommend:\n\n\
             📱 WhatsApp Business\n\
             💳 Digital payment systems\n\
             📊 Spreadsheets for your finances\n\
             📱 Invoicing apps\n\
             🎨 Canva for design\n\
             📈 Google Analytics\n\n\
             Which one would you like to start with?"
        ),
        Some(Topic::Help) => format!(
            "I'm here to help {business} succeed! 🚀 I can assist with:\n\n\
             📱 WhatsApp Business setup\n\
             💰 Pricing strategies\n\
             📈 Marketing ideas\n\
             💵 Financial planning\n\
             📊 Progress tracking\n\
             🛠️ Digital tools\n\n\
             What is your biggest challenge right now?"
        ),
        None => format!(
            "I understand you're asking about \"{}\". As the mentor for {business}, I'm here to help! 🤝\n\n\
             I specialise in:\n\
             • WhatsApp Business and digital sales\n\
             • Marketing and sales strategies\n\
             • Financial planning\n\
             • Digital tools for entrepreneurs\n\n\
             Could you tell me more specifically what you'd like to learn?",
            message.trim()
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Status code and JSON body returned to the chat client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Answers a raw JSON chat request for the user whose snapshot is loaded.
///
/// A `user_id` other than the profile's gets the default context, as if no
/// profile, progress or metrics were found for it.
pub fn handle_request(body: &str, profile: &Profile, snapshot: &Snapshot) -> ChatResponse {
    let request: ChatRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            debug!("Malformed chat request: {e}");
            return ChatResponse {
                status: 500,
                body: json!({ "error": e.to_string() }),
            };
        }
    };

    let (message, user_id) = match (request.message.as_deref(), request.user_id.as_deref()) {
        (Some(m), Some(u)) if !m.trim().is_empty() && !u.trim().is_empty() => (m, u),
        _ => {
            return ChatResponse {
                status: 400,
                body: json!({ "error": "Message and user_id are required" }),
            };
        }
    };

    let context = if profile.user_id.as_deref() == Some(user_id) {
        MentorContext::from_snapshot(profile, snapshot)
    } else {
        debug!("No profile for user {user_id}, using default mentor context");
        MentorContext::default()
    };

    let response = reply(message, &context);
    info!(user_id, "Mentor request processed");
    ChatResponse {
        status: 200,
        body: json!({ "response": response }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::ModuleStatus;
    use crate::core::records::fixtures::{module, progress, record};

    fn profile() -> Profile {
        Profile {
            user_id: Some("u-1".to_string()),
            display_name: Some("Ana".to_string()),
            business_name: Some("Panaderia Sol".to_string()),
            business_type: Some("bakery".to_string()),
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![record("2024-01", 1000.0, 5)],
            vec![module("a", 1), module("b", 2), module("c", 3)],
            vec![
                progress("a", ModuleStatus::Completed, None, None),
                progress("b", ModuleStatus::Completed, None, None),
            ],
        )
        .unwrap()
    }

    #[test]
    fn classifies_by_priority() {
        assert_eq!(classify("Hola, buenos días"), Some(Topic::Greeting));
        assert_eq!(classify("¿Cómo voy?"), Some(Topic::Progress));
        assert_eq!(classify("help with my catálogo"), Some(Topic::WhatsApp));
        assert_eq!(classify("what prices should I set"), Some(Topic::Pricing));
        assert_eq!(classify("more customers please"), Some(Topic::Marketing));
        assert_eq!(classify("mis finanzas"), Some(Topic::Finance));
        assert_eq!(classify("which app should I use"), Some(Topic::DigitalTools));
        assert_eq!(classify("I need advice"), Some(Topic::Help));
        assert_eq!(classify("tell me a story"), None);
    }

    #[test]
    fn short_keywords_need_whole_words() {
        assert_eq!(classify("this history"), None);
        assert_eq!(classify("hi"), Some(Topic::Greeting));
    }

    #[test]
    fn greeting_uses_profile() {
        let context = MentorContext::from_snapshot(&profile(), &snapshot());
        let answer = reply("hello", &context);
        assert!(answer.contains("Ana"));
        assert!(answer.contains("Panaderia Sol"));
    }

    #[test]
    fn progress_reply_reports_completion() {
        let context = MentorContext::from_snapshot(&profile(), &snapshot());
        assert_eq!(context.completed_modules, 2);
        assert_eq!(context.total_modules, 3);
        let answer = reply("how is my progress", &context);
        assert!(answer.contains("2 of 3"));
        assert!(answer.contains("(67%)"));
        assert!(answer.contains("fantastic"));
    }

    #[test]
    fn finance_reply_depends_on_metrics() {
        let mut context = MentorContext::default();
        assert!(reply("budget", &context).starts_with("Let's get your finances organised"));
        context.has_recent_metrics = true;
        assert!(reply("budget", &context).starts_with("Based on your recent numbers"));
    }

    #[test]
    fn fallback_echoes_message() {
        let answer = reply("  tell me a story ", &MentorContext::default());
        assert!(answer.contains("\"tell me a story\""));
        assert!(answer.contains("your business"));
    }

    #[test]
    fn blank_profile_fields_use_defaults() {
        let blank = Profile {
            user_id: None,
            display_name: Some("  ".to_string()),
            business_name: None,
            business_type: None,
        };
        let context = MentorContext::from_snapshot(&blank, &Snapshot::default());
        assert_eq!(context.name, DEFAULT_NAME);
        assert_eq!(context.business, DEFAULT_BUSINESS);
    }

    #[test]
    fn request_requires_message_and_user() {
        let response = handle_request(r#"{"message": "hola"}"#, &profile(), &snapshot());
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "Message and user_id are required");

        let response = handle_request(r#"{"message": "", "user_id": "u-1"}"#, &profile(), &snapshot());
        assert_eq!(response.status, 400);
    }

    #[test]
    fn malformed_request_is_server_error() {
        let response = handle_request("not json", &profile(), &snapshot());
        assert_eq!(response.status, 500);
        assert!(response.body["error"].is_string());
    }

    #[test]
    fn known_user_gets_personal_reply() {
        let response = handle_request(
            r#"{"message": "hola", "user_id": "u-1"}"#,
            &profile(),
            &snapshot(),
        );
        assert_eq!(response.status, 200);
        assert!(response.body["response"].as_str().unwrap().contains("Ana"));
    }

    #[test]
    fn unknown_user_gets_default_context() {
        let response = handle_request(
            r#"{"message": "hola", "user_id": "someone-else"}"#,
            &profile(),
            &snapshot(),
        );
        assert_eq!(response.status, 200);
        assert!(
            response.body["response"]
                .as_str()
                .unwrap()
                .contains(DEFAULT_NAME)
        );
    }
}
