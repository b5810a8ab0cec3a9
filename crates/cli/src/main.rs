use clap::{Args, Parser, Subcommand};
use regubiz_core::{
    format_context, match_clauses, resolve_corpus_path, BusinessProfile, ComplianceService,
    Corpus, FeatureFlag, ReportContext, ViewEvent, ViewState,
};
use regubiz_llm::{ChatCompletionsGenerator, LlmConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "regubiz")]
#[command(about = "Regu-Biz regulatory compliance CLI")]
struct Cli {
    /// Regulatory corpus JSON (defaults to the bundled data file)
    #[arg(long, global = true, env = "REGUBIZ_CORPUS_PATH")]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show corpus statistics
    Stats,
    /// List corpus clauses
    List {
        /// Only show clauses in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Match a business profile against the corpus
    Match(ProfileArgs),
    /// Print the formatted report context for a profile
    Context(ProfileArgs),
    /// Show the business thresholds a profile triggers
    Thresholds(ProfileArgs),
    /// Generate a compliance report (requires OPENAI_API_KEY)
    Report(ProfileArgs),
}

#[derive(Args)]
struct ProfileArgs {
    /// Floor area in square meters
    #[arg(long)]
    size: f64,
    /// Seating capacity
    #[arg(long)]
    capacity: u32,
    /// Special feature: gas_usage, meat, delivery or alcohol (repeatable)
    #[arg(long = "feature")]
    features: Vec<FeatureFlag>,
    /// Business name
    #[arg(long)]
    name: Option<String>,
}

impl ProfileArgs {
    fn to_profile(&self) -> anyhow::Result<BusinessProfile> {
        Ok(
            BusinessProfile::new(self.size, self.capacity, self.features.iter().copied())?
                .with_business_name(self.name.as_deref()),
        )
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("regubiz=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'regubiz --help' for commands");
        return Ok(());
    };

    let corpus = Corpus::load(&resolve_corpus_path(cli.corpus)?)?;

    match command {
        Commands::Stats => {
            let stats = corpus.statistics();
            println!("Source: {} ({})", stats.source_file, stats.extraction_date);
            println!("Clauses: {}", stats.total_clauses);
            for (category, count) in &stats.by_category {
                println!("  {category}: {count}");
            }
            for (chapter, count) in &stats.by_chapter {
                println!("  chapter {chapter}: {count}");
            }
            println!(
                "Thresholds: {} area, {} capacity, {} combined",
                stats.area_thresholds, stats.capacity_thresholds, stats.combined_thresholds
            );
            if stats.skipped_entries > 0 {
                println!("Skipped entries: {}", stats.skipped_entries);
                for skipped in corpus.skipped() {
                    println!("  {}[{}]: {}", skipped.collection, skipped.index, skipped.reason);
                }
            }
        }
        Commands::List { category } => {
            let wanted = category.map(|c| c.trim().to_ascii_lowercase());
            let clauses = corpus
                .clauses()
                .iter()
                .filter(|c| wanted.as_deref().is_none_or(|w| c.category == w));
            let mut shown = 0;
            for clause in clauses {
                shown += 1;
                println!("{} [{}/{}] {}", clause.id, clause.category, clause.topic, clause.title);
            }
            if shown == 0 {
                println!("No clauses found.");
            }
        }
        Commands::Match(args) => {
            let profile = args.to_profile()?;
            let result = match_clauses(&profile, &corpus);
            if result.is_empty() {
                println!("No requirements apply.");
            }
            for matched in result.iter() {
                println!(
                    "{:<11} {} [{}] {}",
                    matched.priority,
                    matched.clause.id,
                    matched.clause.category,
                    matched.reasons.join("; ")
                );
            }
            for conflict in result.conflicts() {
                println!("resolved: {}", conflict.reason);
            }
        }
        Commands::Context(args) => {
            let profile = args.to_profile()?;
            let result = match_clauses(&profile, &corpus);
            print!("{}", format_context(&profile, &result));
            let context =
                ReportContext::build(&profile, &result, corpus.applicable_thresholds(&profile));
            println!();
            print!("{}", context.prompt_context());
        }
        Commands::Thresholds(args) => {
            let profile = args.to_profile()?;
            let hits = corpus.applicable_thresholds(&profile);
            if hits.is_empty() {
                println!("No thresholds triggered.");
            }
            for t in hits.area.iter().chain(hits.capacity.iter()) {
                println!(
                    "{:?} {:?} {} (chapter {} section {}) {}",
                    t.dimension, t.trigger, t.value, t.chapter, t.section, t.context
                );
            }
            for t in &hits.combined {
                println!(
                    "Combined >= {} sqm and >= {} people (section {}) {}",
                    t.area_sqm, t.capacity_people, t.section, t.context
                );
            }
        }
        Commands::Report(args) => {
            let profile = args.to_profile()?;
            run_report(corpus, profile)?;
        }
    }

    Ok(())
}

/// Walk the questionnaire view states for one report request.
fn run_report(corpus: Corpus, profile: BusinessProfile) -> anyhow::Result<()> {
    let llm = LlmConfig::from_values(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("REGUBIZ_LLM_BASE_URL").ok(),
        std::env::var("REGUBIZ_LLM_MODEL").ok(),
        std::env::var("REGUBIZ_LLM_TIMEOUT_SECS").ok(),
    )?
    .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;
    let generator = ChatCompletionsGenerator::new(llm)?;
    let service = ComplianceService::new(Arc::new(corpus));

    let state = ViewState::default().apply(ViewEvent::Submit)?;
    eprintln!("[{}] generating report...", state.name());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(service.generate_report(&generator, &profile));

    match outcome {
        Ok((_, report)) => {
            let state = state.apply(ViewEvent::ReportReady)?;
            eprintln!("[{}] {} via {}", state.name(), report.generated_at, report.model);
            println!("{}", report.content);
            Ok(())
        }
        Err(err) => {
            let state = state.apply(ViewEvent::Failed(err.to_string()))?;
            eprintln!("[{}] {err}", state.name());
            Err(err.into())
        }
    }
}
