//! jobboard: terminal front end for the job board API.
//!
//! Each subcommand dispatches store actions and prints what the store then
//! exposes. `open` goes through the route table the same way a browser
//! navigation would.

mod render;

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jobboard_core::{
    connect, AnalysisKind, ApiConfig, FilterPatch, Mutation, PaginationPatch, ReqwestTransport,
    Router, Store, View,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(author, version, about = "Browse job listings and labor-market analytics")]
#[command(propagate_version = true)]
struct Cli {
    /// Full API base URL, e.g. http://127.0.0.1:8000/api (overrides JOBBOARD_API_*)
    #[arg(long, global = true, env = "JOBBOARD_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Navigate to a front-end path and render its view
    Open {
        /// Path such as /, /jobs, /jobs/12 or /analysis
        path: String,
    },

    /// List jobs matching the given filters
    Jobs {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },

    /// Show one job
    Job { id: u64 },

    /// List companies
    Companies {
        /// Match against name or industry
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },

    /// Show one company
    Company { id: u64 },

    /// Print labor-market distributions
    Analysis {
        /// Only this distribution
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Print the distinct values behind a filter dropdown
    Options {
        #[arg(value_enum)]
        field: OptionArg,
    },
}

#[derive(clap::Args, Default)]
struct FilterArgs {
    /// Free-text search over title and description
    #[arg(long)]
    keyword: Option<String>,
    #[arg(long)]
    province: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    job_type: Option<String>,
    #[arg(long)]
    personnel_type: Option<String>,
    #[arg(long)]
    salary_min: Option<i64>,
    #[arg(long)]
    salary_max: Option<i64>,
    /// Required tag; repeat for several
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Sort field, prefix with - for descending (e.g. -publish_date)
    #[arg(long)]
    ordering: Option<String>,
}

impl FilterArgs {
    fn into_patch(self) -> FilterPatch {
        FilterPatch {
            keyword: self.keyword,
            province: self.province,
            city: self.city,
            industry: self.industry,
            job_type: self.job_type,
            personnel_type: self.personnel_type,
            salary_min: self.salary_min.map(Some),
            salary_max: self.salary_max.map(Some),
            tags: (!self.tags.is_empty()).then_some(self.tags),
            ordering: self.ordering,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Industry,
    Salary,
    Location,
    JobType,
    EducationSalary,
}

impl From<KindArg> for AnalysisKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Industry => AnalysisKind::Industry,
            KindArg::Salary => AnalysisKind::Salary,
            KindArg::Location => AnalysisKind::Location,
            KindArg::JobType => AnalysisKind::JobType,
            KindArg::EducationSalary => AnalysisKind::EducationSalary,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OptionArg {
    PersonnelTypes,
    JobTypes,
    Provinces,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn config(cli: &Cli) -> Result<ApiConfig> {
    let mut config = ApiConfig::from_env().context("reading JOBBOARD_API_* settings")?;
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url)?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = config(&cli)?;
    tracing::debug!(base_url = %config.base_url(), "connecting");
    let store = connect(&config).context("building HTTP client")?;

    match cli.command {
        Commands::Open { path } => open(&store, &path).await?,
        Commands::Jobs {
            filters,
            page,
            page_size,
        } => {
            store.commit(Mutation::SetFilters(filters.into_patch()));
            store
                .set_pagination(PaginationPatch {
                    current_page: Some(page),
                    page_size: Some(page_size),
                    ..Default::default()
                })
                .await?;
            print!("{}", render::job_list(&store.jobs(), &store.pagination()));
        }
        Commands::Job { id } => {
            let job = store.fetch_job_detail(id).await?;
            print!("{}", render::job_detail(&job));
        }
        Commands::Companies {
            search,
            page,
            page_size,
        } => {
            let companies = store
                .fetch_companies(search.as_deref(), page, page_size)
                .await?;
            print!("{}", render::company_list(&companies.items, companies.total));
        }
        Commands::Company { id } => {
            let company = store.fetch_company_detail(id).await?;
            println!("{}", render::company_line(&company));
        }
        Commands::Analysis { kind: Some(kind) } => {
            let kind = AnalysisKind::from(kind);
            match store.fetch_analysis(kind).await? {
                Some(data) => print!("{}", render::distribution(&kind.to_string(), &data)),
                None => println!("no {kind} data available"),
            }
        }
        Commands::Analysis { kind: None } => analysis(&store).await?,
        Commands::Options { field } => match field {
            OptionArg::PersonnelTypes => {
                print!("{}", render::options(&store.fetch_personnel_types().await?));
            }
            OptionArg::JobTypes => print!("{}", render::options(&store.fetch_job_types().await?)),
            OptionArg::Provinces => {
                print!("{}", render::select_options(&store.fetch_provinces().await?));
            }
        },
    }
    Ok(())
}

/// Resolve `path`, print the new title, and render the matched view.
async fn open(store: &Store<ReqwestTransport>, path: &str) -> Result<()> {
    let mut router = Router::new();
    router.before_each(|matched| {
        tracing::info!(view = %matched.route.view, "entering view");
    });
    let matched = router.navigate(path).clone();
    println!("# {}\n", router.title());

    match matched.route.view {
        View::Home => {
            store
                .set_pagination(PaginationPatch {
                    page_size: Some(5),
                    ..Default::default()
                })
                .await?;
            println!("Latest jobs");
            print!("{}", render::job_list(&store.jobs(), &store.pagination()));
        }
        View::JobList => {
            store.fetch_jobs().await?;
            print!("{}", render::job_list(&store.jobs(), &store.pagination()));
        }
        View::JobDetail => {
            let Some(raw) = matched.param("id") else {
                bail!("route {} has no id", matched.route.path);
            };
            let id: u64 = raw
                .parse()
                .with_context(|| format!("job id must be a number, got {raw:?}"))?;
            let job = store.fetch_job_detail(id).await?;
            print!("{}", render::job_detail(&job));
        }
        View::Analysis => analysis(store).await?,
        View::NotFound => println!("nothing at {path}"),
    }
    Ok(())
}

async fn analysis(store: &Store<ReqwestTransport>) -> Result<()> {
    store.fetch_all_analysis_data().await?;
    for kind in AnalysisKind::ALL {
        match store.analysis(kind) {
            Some(data) => println!("{}", render::distribution(&kind.to_string(), &data)),
            None => println!("{kind}\n  no data\n"),
        }
    }
    Ok(())
}
