//! Local validation run before any network call.
//!
//! Each validator returns every failing field at once, keyed by the wire
//! field name, so a form can highlight all of them together.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ranking::{MAX_SCORE, MIN_SCORE};
use crate::records::{Credentials, ProfileInput, PromptInput, RatingInput, TaskInput};

pub const TITLE_MIN: usize = 2;
pub const TITLE_MAX: usize = 120;
pub const BODY_MIN: usize = 5;
pub const BODY_MAX: usize = 4000;
pub const DIFFICULTY_MAX: usize = 50;
pub const COMMENT_MAX: usize = 1000;
pub const PASSWORD_MIN: usize = 6;
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 50;

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

fn check_text(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required."));
    } else if len < min {
        errors.add(field, format!("{label} must have at least {min} characters."));
    } else if len > max {
        errors.add(field, format!("{label} must have at most {max} characters."));
    }
}

fn check_max(errors: &mut FieldErrors, field: &str, label: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("{label} must have at most {max} characters."));
    }
}

pub fn validate_prompt(input: &PromptInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(&mut errors, "titulo", "Title", &input.titulo, TITLE_MIN, TITLE_MAX);
    check_text(&mut errors, "descricao", "Prompt", &input.descricao, BODY_MIN, BODY_MAX);
    errors.into_result()
}

pub fn validate_task(input: &TaskInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(&mut errors, "titulo", "Title", &input.titulo, TITLE_MIN, TITLE_MAX);
    check_text(
        &mut errors,
        "descricao",
        "Description",
        &input.descricao,
        BODY_MIN,
        BODY_MAX,
    );
    if let Some(d) = &input.dificuldade {
        check_max(&mut errors, "dificuldade", "Difficulty", d, DIFFICULTY_MAX);
    }
    if let Some(minutes) = input.tempo_disponivel
        && minutes <= 0
    {
        errors.add("tempoDisponivel", "Available time must be greater than zero.");
    }
    errors.into_result()
}

pub fn validate_rating(input: &RatingInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if !input.nota.is_finite() {
        errors.add("nota", "Enter a score between 0 and 10.");
    } else if input.nota < MIN_SCORE || input.nota > MAX_SCORE {
        errors.add("nota", "The score must be between 0 and 10.");
    }
    if let Some(c) = &input.comentario {
        check_max(&mut errors, "comentario", "Comment", c, COMMENT_MAX);
    }
    if input.ia_id <= 0 {
        errors.add("iaId", "Choose an AI to rate.");
    }
    errors.into_result()
}

/// Loose address check: one `@`, something on both sides, a dot in the domain.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn validate_credentials(input: &Credentials) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = input.email.trim();
    if email.is_empty() {
        errors.add("email", "Email is required.");
    } else if !looks_like_email(email) {
        errors.add("email", "Enter a valid email.");
    }
    if input.senha.is_empty() {
        errors.add("senha", "Password is required.");
    } else if input.senha.chars().count() < PASSWORD_MIN {
        errors.add(
            "senha",
            format!("Password must have at least {PASSWORD_MIN} characters."),
        );
    }
    errors.into_result()
}

pub fn validate_profile(input: &ProfileInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(&mut errors, "nome", "Name", input.nome.trim(), NAME_MIN, NAME_MAX);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(titulo: &str, descricao: &str) -> PromptInput {
        PromptInput {
            titulo: titulo.into(),
            descricao: descricao.into(),
        }
    }

    #[test]
    fn valid_prompt_passes() {
        assert!(validate_prompt(&prompt("Resumo", "Resuma o capítulo 2")).is_ok());
    }

    #[test]
    fn prompt_reports_all_fields() {
        let errs = validate_prompt(&prompt("A", "")).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.get("titulo").unwrap().contains("at least 2"));
        assert!(errs.get("descricao").unwrap().contains("required"));
    }

    #[test]
    fn prompt_body_too_long() {
        let long = "x".repeat(BODY_MAX + 1);
        let errs = validate_prompt(&prompt("Ok", &long)).unwrap_err();
        assert!(errs.get("descricao").unwrap().contains("at most 4000"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 120 two-byte characters is still within bounds.
        let title = "ç".repeat(TITLE_MAX);
        assert!(validate_prompt(&prompt(&title, "cinco")).is_ok());
    }

    #[test]
    fn task_time_must_be_positive() {
        let input = TaskInput {
            titulo: "Ler".into(),
            descricao: "Ler artigo".into(),
            dificuldade: Some("x".repeat(DIFFICULTY_MAX + 1)),
            tempo_disponivel: Some(0),
        };
        let errs = validate_task(&input).unwrap_err();
        assert!(errs.get("tempoDisponivel").is_some());
        assert!(errs.get("dificuldade").is_some());
        assert!(errs.get("titulo").is_none());
    }

    #[test]
    fn rating_range_and_target() {
        let mut input = RatingInput {
            nota: 10.5,
            comentario: None,
            ia_id: 0,
        };
        let errs = validate_rating(&input).unwrap_err();
        assert!(errs.get("nota").is_some());
        assert!(errs.get("iaId").is_some());

        input.nota = f64::NAN;
        input.ia_id = 3;
        let errs = validate_rating(&input).unwrap_err();
        assert_eq!(errs.get("nota"), Some("Enter a score between 0 and 10."));

        input.nota = 0.0;
        assert!(validate_rating(&input).is_ok());
        input.nota = 10.0;
        assert!(validate_rating(&input).is_ok());
    }

    #[test]
    fn credentials_checks() {
        let ok = Credentials {
            email: "  ana@fiap.com.br ".into(),
            senha: "segredo".into(),
        };
        assert!(validate_credentials(&ok).is_ok());

        let bad = Credentials {
            email: "ana@".into(),
            senha: "123".into(),
        };
        let errs = validate_credentials(&bad).unwrap_err();
        assert_eq!(errs.get("email"), Some("Enter a valid email."));
        assert!(errs.get("senha").unwrap().contains("at least 6"));
    }

    #[test]
    fn profile_name_is_trimmed() {
        let input = ProfileInput { nome: "  A  ".into() };
        assert!(validate_profile(&input).is_err());
        let input = ProfileInput { nome: " Ana ".into() };
        assert!(validate_profile(&input).is_ok());
    }

    #[test]
    fn field_errors_display_and_json() {
        let mut errs = FieldErrors::new();
        errs.add("b", "second");
        errs.add("a", "first");
        errs.add("a", "ignored");
        assert_eq!(errs.to_string(), "a: first; b: second");
        let json = serde_json::to_value(&errs).unwrap();
        assert_eq!(json["a"], "first");
    }
}
