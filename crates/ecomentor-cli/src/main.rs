mod config;
mod display;
mod platform;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ecomentor_api::insight::DEFAULT_TOP;
use ecomentor_api::{ServiceFailure, service};
use ecomentor_app::{AppContext, DispatchOutcome, MountGuard, Navigator, Router};
use ecomentor_core::insight::RefineRequest;
use ecomentor_core::{Credentials, Platform, PromptInput, RatingInput, TaskInput};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::config::Config;
use crate::platform::{ConfiguredTokenSource, TerminalNotifier};

#[derive(Parser)]
#[command(name = "ecomentor", version, about = "Study assistant: eco ranking of AI tools, prompts, tasks and an AI mentor")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Backend base URL.
    #[arg(long, global = true, env = "ECOMENTOR_API_URL")]
    api_url: Option<String>,

    /// Push gateway endpoint.
    #[arg(long, global = true, env = "ECOMENTOR_PUSH_GATEWAY_URL")]
    gateway_url: Option<String>,

    /// Push environment; "off" disables remote push.
    #[arg(long, global = true, env = "ECOMENTOR_PUSH_ENV")]
    push_env: Option<String>,

    #[arg(long, global = true, env = "ECOMENTOR_USER_ID")]
    user_id: Option<i64>,

    /// android, ios, web or desktop.
    #[arg(long, global = true, env = "ECOMENTOR_PLATFORM")]
    platform: Option<Platform>,

    /// Push token of this device.
    #[arg(long, global = true, env = "ECOMENTOR_DEVICE_PUSH_TOKEN")]
    push_token: Option<String>,

    /// Allow local notifications ("true"/"false").
    #[arg(long, global = true, env = "ECOMENTOR_LOCAL_NOTIFICATIONS")]
    local_notifications: Option<String>,

    /// Session token printed by `login`.
    #[arg(long, global = true, env = "ECOMENTOR_TOKEN")]
    token: Option<String>,

    /// `tracing` filter, e.g. "info" or "ecomentor_api=debug".
    #[arg(long = "log", global = true, env = "ECOMENTOR_LOG")]
    log_level: Option<String>,

    /// Emit logs as JSON lines ("true"/"false").
    #[arg(long, global = true, env = "ECOMENTOR_LOG_JSON")]
    log_json: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,
}

impl GlobalArgs {
    fn apply(&self, cfg: &mut Config) {
        if let Some(v) = &self.api_url {
            cfg.api_url = v.clone();
        }
        if let Some(v) = &self.gateway_url {
            cfg.gateway_url = v.clone();
        }
        if let Some(v) = &self.push_env {
            cfg.push_env = v.clone();
        }
        if let Some(v) = self.user_id {
            cfg.user_id = v;
        }
        if let Some(v) = self.platform {
            cfg.platform = v;
        }
        if let Some(v) = &self.push_token {
            cfg.device_push_token = Some(v.clone()).filter(|t| !t.is_empty());
        }
        if let Some(v) = &self.local_notifications {
            cfg.local_notifications = config::flag(v);
        }
        if let Some(v) = &self.token {
            cfg.session_token = Some(v.clone()).filter(|t| !t.is_empty());
        }
        if let Some(v) = &self.log_level {
            cfg.log_level = v.clone();
        }
        if let Some(v) = &self.log_json {
            cfg.log_json = config::flag(v);
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show the eco ranking of AI tools.
    Ranking {
        /// Show only the first N entries.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage saved prompts.
    #[command(subcommand)]
    Prompts(PromptCmd),
    /// Manage study tasks.
    #[command(subcommand)]
    Tasks(TaskCmd),
    /// Rate an AI tool from 0 to 10.
    Rate {
        #[arg(long)]
        ia_id: i64,
        #[arg(long)]
        nota: f64,
        #[arg(long)]
        comentario: Option<String>,
    },
    /// Ask the AI mentor.
    #[command(subcommand)]
    Mentor(MentorCmd),
    /// Usage and energy analytics.
    Analytics {
        #[arg(long, default_value_t = DEFAULT_TOP)]
        top: u32,
    },
    /// Analyze a photo of your workspace.
    Vision { image: PathBuf },
    /// Start a local session and print its token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        senha: String,
    },
    /// Push notification registration.
    #[command(subcommand)]
    Push(PushCmd),
    /// Route a notification data payload as if it had been tapped.
    Open {
        /// JSON payload, e.g. '{"screen":"Explore","params":{"section":"tasks"}}'.
        data: String,
    },
}

#[derive(Subcommand)]
enum PromptCmd {
    List,
    Add {
        #[arg(long)]
        titulo: String,
        #[arg(long)]
        descricao: String,
    },
    Edit {
        id: i64,
        #[arg(long)]
        titulo: String,
        #[arg(long)]
        descricao: String,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum TaskCmd {
    List {
        /// Leave these task ids out of the listing.
        #[arg(long)]
        hide: Vec<i64>,
    },
    Add {
        #[arg(long)]
        titulo: String,
        #[arg(long)]
        descricao: String,
        #[arg(long)]
        dificuldade: Option<String>,
        /// Available time in minutes.
        #[arg(long)]
        minutos: Option<i64>,
    },
    /// Generate a recommendation for a task.
    Recommend { id: i64 },
}

#[derive(Subcommand)]
enum MentorCmd {
    /// Explain how to approach a task with and without AI.
    Explain {
        descricao: String,
        #[arg(long)]
        contexto: Option<String>,
    },
    /// Build a weekly study plan.
    Plan {
        objetivo: String,
        #[arg(long, default_value_t = 5)]
        horas: u32,
    },
    /// Refine a draft text.
    Refine {
        texto: String,
        #[arg(long, default_value = "post_linkedin")]
        tipo: String,
        #[arg(long, default_value = "profissional")]
        tom: String,
        #[arg(long, default_value = "medio")]
        tamanho: String,
    },
    /// Summarize your AI usage.
    Summary,
}

#[derive(Subcommand)]
enum PushCmd {
    /// Obtain this device's push token and register it with the backend.
    Register,
    /// Show push configuration and the cached token.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::default();
    cli.global.apply(&mut cfg);
    init_tracing(&cfg);

    info!(version = env!("CARGO_PKG_VERSION"), api_url = %cfg.api_url, "ecomentor starting");

    let json = cli.global.json;
    match run(cli.command, &cfg, json).await {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast::<ServiceFailure>() {
            Ok(failure) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&failure)?);
                } else {
                    eprint!("{}", display::failure(&failure));
                }
                std::process::exit(1);
            }
            Err(e) => Err(e),
        },
    }
}

fn init_tracing(cfg: &Config) {
    let env_filter = match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "WARN: ECOMENTOR_LOG='{}' is not a valid tracing filter ({}); falling back to 'info'",
                cfg.log_level, e
            );
            tracing_subscriber::EnvFilter::new("info")
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn build_context(cfg: &Config) -> AppContext {
    let source = Arc::new(ConfiguredTokenSource::new(
        cfg.platform,
        cfg.device_push_token.clone(),
    ));
    let local = Arc::new(TerminalNotifier::new(cfg.local_permission()));
    let mut ctx = AppContext::new(cfg.app_settings(), source, local);
    if let Some(token) = &cfg.session_token {
        ctx.resume(token.clone());
    }
    ctx
}

async fn run(command: Command, cfg: &Config, json: bool) -> anyhow::Result<()> {
    let mut ctx = build_context(cfg);
    let guard = MountGuard::new();

    match command {
        Command::Ranking { limit } => {
            let mut control = ctx.ranking(guard);
            control.reload().await?;
            let ranked = control.ranked();
            let shown = &ranked[..limit.unwrap_or(ranked.len()).min(ranked.len())];
            emit(json, &shown, |items| display::ranking_table(items))?;
        }

        Command::Prompts(cmd) => {
            let mut control = ctx.prompts(guard);
            match cmd {
                PromptCmd::List => {
                    control.reload().await?;
                    emit(json, &control.items(), |items| display::prompt_list(items))?;
                }
                PromptCmd::Add { titulo, descricao } => {
                    let prompt = control.add(&PromptInput { titulo, descricao }).await?;
                    report_dispatch(control.last_dispatch());
                    emit(json, &prompt, |p| display::prompt_list(&[p]))?;
                }
                PromptCmd::Edit {
                    id,
                    titulo,
                    descricao,
                } => {
                    let prompt = control
                        .update(id, &PromptInput { titulo, descricao })
                        .await?;
                    emit(json, &prompt, |p| display::prompt_list(&[p]))?;
                }
                PromptCmd::Delete { id } => {
                    control.remove(id).await?;
                    emit(json, &json!({ "deleted": id }), |_| {
                        format!("Deleted prompt {id}.\n")
                    })?;
                }
            }
        }

        Command::Tasks(cmd) => {
            let mut control = ctx.tasks(guard);
            match cmd {
                TaskCmd::List { hide } => {
                    control.reload().await?;
                    for id in hide {
                        control.hide(id);
                    }
                    emit(json, &control.visible(), |tasks| display::task_list(tasks))?;
                }
                TaskCmd::Add {
                    titulo,
                    descricao,
                    dificuldade,
                    minutos,
                } => {
                    let input = TaskInput {
                        titulo,
                        descricao,
                        dificuldade,
                        tempo_disponivel: minutos,
                    };
                    let task = control.add(&input).await?;
                    report_dispatch(control.last_dispatch());
                    emit(json, &task, |t| display::task_list(&[t]))?;
                }
                TaskCmd::Recommend { id } => {
                    let rec = control.recommend(id).await?;
                    emit(json, &rec, display::recommendation_card)?;
                }
            }
        }

        Command::Rate {
            ia_id,
            nota,
            comentario,
        } => {
            let mut control = ctx.ratings(guard);
            let input = RatingInput {
                nota,
                comentario,
                ia_id,
            };
            let rating = control.add(&input).await?;
            report_dispatch(control.last_dispatch());
            emit(json, &rating, display::rating_card)?;
        }

        Command::Mentor(cmd) => {
            let api = ctx.api();
            match cmd {
                MentorCmd::Explain {
                    descricao,
                    contexto,
                } => {
                    let e = service::explain_task(api, &descricao, contexto.as_deref()).await?;
                    emit(json, &e, display::explanation_card)?;
                }
                MentorCmd::Plan { objetivo, horas } => {
                    let plan = service::study_plan(api, &objetivo, horas).await?;
                    emit(json, &plan, display::study_plan_card)?;
                }
                MentorCmd::Refine {
                    texto,
                    tipo,
                    tom,
                    tamanho,
                } => {
                    let req = RefineRequest {
                        tipo,
                        texto_inicial: texto,
                        tom,
                        tamanho,
                    };
                    let refined = service::refine_result(api, &req).await?;
                    emit(json, &refined, display::refined_card)?;
                }
                MentorCmd::Summary => {
                    let summary = service::usage_summary(api, &cfg.user_id.to_string()).await?;
                    emit(json, &summary, display::usage_summary_card)?;
                }
            }
        }

        Command::Analytics { top } => {
            let api = ctx.api();
            let user_id = cfg.user_id.to_string();
            let (top, categories, eco) = futures::join!(
                service::top_used(api, top),
                service::usage_by_category(api),
                service::eco_consumption(api, &user_id),
            );
            let (top, categories, eco) = (top?, categories?, eco?);
            let report = json!({ "top": top, "categorias": categories, "eco": eco });
            emit(json, &report, |_| {
                display::analytics_report(&top, &categories, &eco)
            })?;
        }

        Command::Vision { image } => {
            let report = service::analyze_environment(ctx.api(), &image).await?;
            emit(json, &report, display::environment_card)?;
        }

        Command::Login { email, senha } => {
            let session = ctx.sign_in(&Credentials { email, senha })?;
            let token = session.token.clone().unwrap_or_default();
            emit(
                json,
                &json!({ "token": token, "email": session.email }),
                |_| format!("Signed in. Export ECOMENTOR_TOKEN={token} to stay signed in.\n"),
            )?;
        }

        Command::Push(cmd) => match cmd {
            PushCmd::Register => {
                let token = ctx
                    .registry()
                    .request_token()
                    .await
                    .context("obtaining push token")?;
                emit(json, &json!({ "token": token }), |_| {
                    format!("Push token registered: {token}\n")
                })?;
            }
            PushCmd::Status => {
                let registry = ctx.registry();
                if ctx.dispatcher().push_enabled() {
                    registry.sync_registration().await;
                }
                let status = json!({
                    "push_enabled": ctx.dispatcher().push_enabled(),
                    "platform": registry.platform(),
                    "token": registry.current_token().await,
                    "last_error": registry.last_error().await,
                });
                emit(json, &status, push_status)?;
            }
        },

        Command::Open { data } => {
            let payload: Value =
                serde_json::from_str(&data).context("parsing notification payload")?;
            let (nav, rx) = Navigator::channel(8);
            let router = tokio::spawn(Router::default().run(rx));
            let routed = nav.on_tap(&payload).await;
            drop(nav);
            let router = router.await.context("router task")?;
            let route = router.current();
            let out = json!({
                "routed": routed,
                "screen": route.screen,
                "params": route.params,
            });
            emit(json, &out, |_| {
                format!("{} {}\n", route.screen, Value::Object(route.params.clone()))
            })?;
        }
    }

    Ok(())
}

/// Print `value` as JSON or through `text`.
fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

fn report_dispatch(outcome: Option<&DispatchOutcome>) {
    if let Some(outcome) = outcome {
        eprintln!("{}", display::dispatch_outcome(outcome));
    }
}

fn push_status(status: &Value) -> String {
    let field = |k: &str| match &status[k] {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!(
        "push enabled   {}\nplatform       {}\ntoken          {}\nlast error     {}\n",
        field("push_enabled"),
        field("platform"),
        field("token"),
        field("last_error"),
    )
}
