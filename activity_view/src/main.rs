use std::rc::Rc;

use activity_view::{
    api::HttpSessionApi,
    columns::Column,
    config::{DEFAULT_SERVER_URL, SERVER_URL_ENV},
    controller::SessionView,
    enrich::LabelTables,
    table::{render_detail, render_table},
};
use anyhow::bail;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tokio::task::LocalSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Lists recorded sessions with derived metrics and matched weather.
#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the session and weather services
    #[arg(long, env = SERVER_URL_ENV, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Earliest start date to show (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    from: String,

    /// Latest start date to show (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    to: String,

    /// Columns to show in addition to the defaults
    #[arg(long, value_delimiter = ',')]
    show: Vec<Column>,

    /// Columns to hide
    #[arg(long, value_delimiter = ',')]
    hide: Vec<Column>,

    /// Sessions to select and show weather for
    #[arg(long, value_delimiter = ',')]
    select: Vec<i64>,

    /// Seed for the synthetic fields
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    LocalSet::new().run_until(run(args)).await
}

async fn run(args: Args) -> anyhow::Result<()> {
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let api = Rc::new(HttpSessionApi::new(&args.server));
    let mut view = SessionView::new(api, LabelTables::default(), rng);

    let state = view.state_mut();
    state.set_range_from_dates(&args.from, &args.to)?;
    for column in &args.show {
        state.visibility_mut().set(*column, true);
    }
    for column in &args.hide {
        state.visibility_mut().set(*column, false);
    }

    view.load().await;
    if let Some(error) = view.state().error() {
        bail!("could not load sessions: {error}");
    }

    for session_id in &args.select {
        view.select(*session_id);
    }
    view.settle().await;

    print!("{}", render_table(view.state()));

    for session_id in &args.select {
        view.select_cached(*session_id);
        if let Some(detail) = view.state().selected_detail() {
            println!();
            print!("{}", render_detail(&detail));
        }
    }

    Ok(())
}
