//! Plain-text rendering for ranking tables and record cards.
//!
//! Cards are grouped into titled sections of `label  value` rows; empty
//! sections are skipped and long lists are cut at [`MAX_LIST_ITEMS`].

use std::fmt::Write;

use ecomentor_api::ServiceFailure;
use ecomentor_app::DispatchOutcome;
use ecomentor_core::insight::{
    CategoryUsage, Difficulty, EcoConsumption, EnvironmentReport, RefinedText, StudyPlan,
    TaskExplanation, TopUsage, UsageSummary,
};
use ecomentor_core::{Prompt, RankedItem, Rating, Recommendation, Task};
use serde_json::Value;

const MAX_LIST_ITEMS: usize = 10;
const NAME_WIDTH: usize = 28;

// ── Ranking ──

pub fn ranking_table(items: &[RankedItem]) -> String {
    let mut out = String::new();
    if items.is_empty() {
        out.push_str("No AI tools in the catalog yet.\n");
        return out;
    }
    let _ = writeln!(
        out,
        "{:>3}  {:<w$}  {:>5}  {:>7}  {}",
        "#",
        "name",
        "score",
        "ratings",
        "category",
        w = NAME_WIDTH + 3
    );
    for r in items {
        let it = &r.item;
        let _ = writeln!(
            out,
            "{:>3}  {} {:<w$}  {:>2}/10  {:>7}  {}",
            r.rank,
            it.glyph,
            truncate(&it.name, NAME_WIDTH),
            it.score,
            it.total_ratings,
            it.category,
            w = NAME_WIDTH
        );
    }
    out
}

// ── Prompts & tasks ──

pub fn prompt_list(prompts: &[&Prompt]) -> String {
    let mut out = String::new();
    if prompts.is_empty() {
        out.push_str("No prompts saved.\n");
        return out;
    }
    for p in prompts {
        let _ = writeln!(out, "[{}] {}", p.id, p.titulo);
        let _ = writeln!(out, "    {}", truncate(&p.descricao, 72));
    }
    out
}

pub fn task_list(tasks: &[&Task]) -> String {
    let mut out = String::new();
    if tasks.is_empty() {
        out.push_str("No tasks.\n");
        return out;
    }
    for t in tasks {
        let _ = write!(out, "[{}] {}", t.id, t.titulo);
        if let Some(d) = &t.dificuldade {
            let _ = write!(out, "  ({d})");
        }
        if let Some(m) = t.tempo_disponivel {
            let _ = write!(out, "  {m} min");
        }
        out.push('\n');
        let _ = writeln!(out, "    {}", truncate(&t.descricao, 72));
        if let Some(rec) = &t.recomendacao {
            out.push_str(&recommendation_card(rec));
        }
    }
    out
}

pub fn recommendation_card(rec: &Recommendation) -> String {
    let mut card = Card::new();
    card.section("Recommendation");
    card.row("id", rec.id);
    card.opt("generated", rec.conteudo_gerado.as_deref());
    card.opt("insights", rec.insights.as_deref());
    card.opt("steps", rec.passos.as_deref());
    card.opt("ai", rec.ia.as_ref().map(|ia| ia.nome.as_str()));
    card.finish()
}

pub fn rating_card(rating: &Rating) -> String {
    let mut card = Card::new();
    card.section("Rating");
    card.row("id", rating.id);
    card.row("score", format!("{}/10", rating.nota));
    card.opt("comment", rating.comentario.as_deref());
    card.opt("ai", rating.ia.as_ref().map(|ia| ia.nome.as_str()));
    card.finish()
}

// ── Mentor ──

pub fn explanation_card(e: &TaskExplanation) -> String {
    let mut card = Card::new();
    card.section("Recommended AI");
    card.row("ai", &e.ia_indicada);
    card.opt("category", e.categoria.as_deref());
    card.row("difficulty", difficulty(e.dificuldade));
    card.row("estimated time", format!("{} min", e.tempo_estimado_min));
    card.section("When to use");
    card.row("use for", &e.quando_usar);
    card.row("avoid for", &e.quando_evitar);
    card.list("Steps on your own", &e.passos_humano);
    card.list("Steps with AI", &e.passos_com_ia);
    card.finish()
}

pub fn study_plan_card(plan: &StudyPlan) -> String {
    let mut card = Card::new();
    card.section(&format!("{} ({} weeks)", plan.objetivo, plan.duracao_semanas));
    for week in plan.semanas.iter().take(MAX_LIST_ITEMS) {
        card.row(&format!("week {}", week.semana), &week.foco);
        if !week.temas.is_empty() {
            card.row("  topics", week.temas.join(", "));
        }
        if !week.tarefas.is_empty() {
            card.row("  tasks", week.tarefas.join("; "));
        }
    }
    card.more(plan.semanas.len());
    card.finish()
}

pub fn refined_card(r: &RefinedText) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", r.texto_refinado);
    if !r.explicacao_melhorias.is_empty() {
        let _ = writeln!(out, "\nWhat changed: {}", r.explicacao_melhorias);
    }
    out
}

pub fn usage_summary_card(s: &UsageSummary) -> String {
    format!("Usage summary for {}\n  {}\n", s.usuario_id, s.resumo)
}

// ── Analytics ──

pub fn analytics_report(
    top: &[TopUsage],
    categories: &[CategoryUsage],
    eco: &EcoConsumption,
) -> String {
    let mut card = Card::new();
    card.section("Most used AIs");
    for t in top.iter().take(MAX_LIST_ITEMS) {
        card.row(&t.nome, format!("{} uses", t.usos));
    }
    card.section("Usage by category");
    for c in categories.iter().take(MAX_LIST_ITEMS) {
        card.row(&c.categoria, format!("{} uses", c.usos));
    }
    card.section(&format!("Energy estimate for {}", eco.usuario_id));
    card.row("total", format!("{:.2} Wh", eco.total_consumo_wh_estimado));
    for d in eco.detalhado.iter().take(MAX_LIST_ITEMS) {
        card.row(&d.nome, format!("{:.2} Wh over {} uses", d.consumo_wh, d.usos));
    }
    card.more(eco.detalhado.len());
    card.finish()
}

// ── Vision ──

pub fn environment_card(report: &EnvironmentReport) -> String {
    let mut card = Card::new();
    card.section("Workspace");
    card.row("overall", &report.classificacao_geral);
    for (label, section) in [
        ("ergonomics", &report.ergonomia),
        ("lighting", &report.iluminacao),
        ("organization", &report.organizacao),
    ] {
        match EnvironmentReport::level(section) {
            Some(level) => card.row(label, level),
            None if !section.is_null() => card.row(label, compact(section)),
            None => {}
        }
    }
    card.list("Recommendations", &report.recomendacoes);
    card.finish()
}

// ── Outcomes ──

pub fn failure(f: &ServiceFailure) -> String {
    let mut out = format!("error: {}\n", f.message);
    for (field, msg) in f.field_errors.iter() {
        let _ = writeln!(out, "  {field:<16} {msg}");
    }
    out
}

pub fn dispatch_outcome(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::DeliveredRemote { ticket } => match ticket {
            Some(id) => format!("push sent (ticket {id})"),
            None => "push sent".to_string(),
        },
        DispatchOutcome::DeliveredLocal { id } => format!("local notification scheduled ({id})"),
        DispatchOutcome::RemoteFailed { reason } => format!("push failed: {reason}"),
        DispatchOutcome::Suppressed => "notification suppressed".to_string(),
    }
}

// ── Helpers ──

struct Card {
    out: String,
}

impl Card {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn section(&mut self, header: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let _ = writeln!(self.out, "{header}");
    }

    fn row(&mut self, label: &str, value: impl std::fmt::Display) {
        let _ = writeln!(self.out, "  {label:<26} {value}");
    }

    fn opt(&mut self, label: &str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            self.row(label, v);
        }
    }

    fn list(&mut self, header: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        self.section(&format!("{header} ({})", items.len()));
        for (i, item) in items.iter().take(MAX_LIST_ITEMS).enumerate() {
            let _ = writeln!(self.out, "    {}. {}", i + 1, item);
        }
        self.more(items.len());
    }

    fn more(&mut self, len: usize) {
        if len > MAX_LIST_ITEMS {
            let _ = writeln!(self.out, "    ... and {} more", len - MAX_LIST_ITEMS);
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn difficulty(d: Difficulty) -> &'static str {
    match d {
        Difficulty::Baixa => "low",
        Difficulty::Media => "medium",
        Difficulty::Alta => "high",
    }
}

fn compact(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecomentor_core::{CatalogEntry, rank_catalog};
    use serde_json::json;

    #[test]
    fn ranking_rows_show_rank_glyph_and_score() {
        let entries: Vec<CatalogEntry> = serde_json::from_value(json!([
            { "id": "1", "nome": "Lumen", "tipo": "imagem", "eco_score": 9.1 },
            { "id": "2", "nome": "Tutor", "tipo": "estudos", "eco_score": 4.4 }
        ]))
        .unwrap();
        let table = ranking_table(&rank_catalog(&entries));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("🎨 Lumen"));
        assert!(lines[1].contains(" 9/10"));
        assert!(lines[2].trim_start().starts_with("2  📚 Tutor"));
    }

    #[test]
    fn empty_ranking_has_message() {
        assert_eq!(ranking_table(&[]), "No AI tools in the catalog yet.\n");
    }

    #[test]
    fn long_lists_are_cut() {
        let steps: Vec<String> = (1..=13).map(|i| format!("step {i}")).collect();
        let e = TaskExplanation {
            ia_indicada: "ChatGPT".into(),
            quando_usar: "drafts".into(),
            quando_evitar: "exams".into(),
            passos_humano: steps,
            passos_com_ia: vec![],
            dificuldade: Difficulty::Alta,
            tempo_estimado_min: 90,
            categoria: None,
        };
        let card = explanation_card(&e);
        assert!(card.contains("Steps on your own (13)"));
        assert!(card.contains("    10. step 10"));
        assert!(!card.contains("step 11"));
        assert!(card.contains("... and 3 more"));
        assert!(!card.contains("Steps with AI"));
        assert!(card.contains("high"));
    }

    #[test]
    fn failure_lists_fields() {
        let mut fields = ecomentor_core::FieldErrors::new();
        fields.add("titulo", "Title is required.");
        let text = failure(&ServiceFailure::validation(fields));
        assert!(text.starts_with("error: "));
        assert!(text.contains("titulo"));
        assert!(text.contains("Title is required."));
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("ação", 10), "ação");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
