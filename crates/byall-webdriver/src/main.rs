use anyhow::Context;
use byall_core::{ByAll, DriverError, Locator, QuotePolicy, ReferenceElement};
use byall_webdriver::config::{ByAllConfig, ConfigLoader};
use byall_webdriver::{Seed, WebDriverClient, WebElement, wait_until_all_visible, wait_until_visible};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "byall", version, about = "Re-locate page elements through fallback strategies")]
struct Args {
    /// Config file (defaults to ./byall.yaml, then ~/.byall/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// WebDriver server URL, overrides the config file
    #[arg(long, global = true)]
    webdriver_url: Option<Url>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct Target {
    /// Page to open
    page: Url,

    /// How to find the reference element
    #[arg(long, value_enum)]
    by: SeedKind,

    /// Value for the `--by` strategy
    #[arg(long)]
    value: String,

    /// Overrides `locator.quote_policy` from the config file
    #[arg(long, value_enum)]
    quote_policy: Option<QuotePolicyArg>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the strategies derived from the reference element
    Strategies {
        #[command(flatten)]
        target: Target,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Derive strategies from the reference element and resolve them again
    Locate {
        #[command(flatten)]
        target: Target,

        /// Collect matches from every strategy instead of the first
        #[arg(long)]
        all: bool,

        /// Click the reference element before resolving
        #[arg(long)]
        click_seed: bool,

        /// Switch to this window index before resolving
        #[arg(long)]
        window: Option<usize>,

        /// Type this text into the first match
        #[arg(long = "type")]
        type_text: Option<String>,

        /// Print this attribute of each match instead of its text
        #[arg(long)]
        attribute: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SeedKind {
    Id,
    Name,
    Css,
    Xpath,
    LinkText,
}

#[derive(Clone, Copy, ValueEnum)]
enum QuotePolicyArg {
    Verbatim,
    Escape,
}

impl From<QuotePolicyArg> for QuotePolicy {
    fn from(arg: QuotePolicyArg) -> Self {
        match arg {
            QuotePolicyArg::Verbatim => QuotePolicy::Verbatim,
            QuotePolicyArg::Escape => QuotePolicy::Escape,
        }
    }
}

impl Target {
    fn seed(&self) -> Seed {
        let value = self.value.clone();
        match self.by {
            SeedKind::Id => Seed::Id(value),
            SeedKind::Name => Seed::Name(value),
            SeedKind::Css => Seed::Css(value),
            SeedKind::Xpath => Seed::XPath(value),
            SeedKind::LinkText => Seed::LinkText(value),
        }
    }

}

impl Command {
    fn target(&self) -> &Target {
        match self {
            Command::Strategies { target, .. } | Command::Locate { target, .. } => target,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the results.
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let loaded = ConfigLoader::load(args.config.as_deref()).await?;
    match &loaded.source {
        Some(path) => info!("Using config {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    let mut config = loaded.config;
    config.apply_overrides(
        args.webdriver_url.as_ref(),
        args.command.target().quote_policy.map(QuotePolicy::from),
    );

    let client = WebDriverClient::connect(
        &config.webdriver.url,
        Some(config.webdriver.capabilities.clone()),
    )
    .await?;

    let result = run(&client, &config, args.command).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    finish(result, client.close().await)
}

/// The command's own error wins; a failed close is only logged.
fn finish(result: anyhow::Result<()>, closed: Result<(), DriverError>) -> anyhow::Result<()> {
    match closed {
        Err(e) if result.is_err() => warn!("Failed to close WebDriver session: {}", e),
        Err(e) => return Err(e).context("closing WebDriver session"),
        Ok(()) => {}
    }
    result
}

async fn run(client: &WebDriverClient, config: &ByAllConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Strategies { target, json } => {
            let (_, locator) = open_reference(client, config, &target).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(locator.strategies())?);
            } else {
                for entry in locator.strategies() {
                    println!("{:<20} {}", entry.strategy.name(), entry.query);
                }
            }
        }
        Command::Locate {
            target,
            all,
            click_seed,
            window,
            type_text,
            attribute,
        } => {
            let (seed, locator) = open_reference(client, config, &target).await?;
            let wait = config.webdriver.wait_options();

            if click_seed {
                seed.click().await?;
            }
            if let Some(index) = window {
                client.switch_to_window(index).await?;
            }

            let found = if all {
                let found = locator.find_elements(client).await?;
                wait_until_all_visible(&found, wait).await?;
                found
            } else {
                let element = locator.find_element(client).await?;
                wait_until_visible(&element, wait).await?;
                vec![element]
            };

            info!("{} element(s) located", found.len());
            for element in &found {
                println!("{}", describe(element, attribute.as_deref()).await?);
            }

            if let (Some(text), Some(first)) = (type_text, found.first()) {
                first.send_keys(&text).await?;
                info!("Typed into first match");
            }
        }
    }
    Ok(())
}

/// Opens the page, waits for the reference element and derives its locator.
async fn open_reference(
    client: &WebDriverClient,
    config: &ByAllConfig,
    target: &Target,
) -> anyhow::Result<(WebElement, ByAll)> {
    client.goto(target.page.as_str()).await?;

    let seed = target.seed();
    let element = client
        .find(&seed)
        .await
        .with_context(|| format!("reference element {} not found", seed))?;
    wait_until_visible(&element, config.webdriver.wait_options()).await?;

    let locator = ByAll::from_element_with(&element, config.locator.quote_policy).await?;
    info!("{}", locator);
    Ok((element, locator))
}

async fn describe(element: &WebElement, attribute: Option<&str>) -> anyhow::Result<String> {
    let value = match attribute {
        Some(name) => element.attribute(name).await?.unwrap_or_default(),
        None => element.text().await?,
    };
    let tag = element.tag_name().await?;
    Ok(format!("<{}> {}", tag, value))
}
