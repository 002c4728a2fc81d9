// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod account;
mod config;
mod render;
mod runtime;
mod session_file;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use docket_app::{Backend, Resource, ViewTab};
use docket_testkit::FakeBackend;
use runtime::Runtime;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEMO_SEED: u64 = 7;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `docket --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    init_tracing(config.log_level());

    let session_path = config.session_path()?;
    let mut client = docket_api::Client::new(&config.base_url(), config.timeout()?)
        .with_context(|| {
            format!(
                "invalid [api] config in {}; fix base_url/timeout or DOCKET_API_URL",
                options.config_path.display()
            )
        })?;
    if let Some(session) = session_file::load(&session_path)? {
        client = client.with_session(session);
    }
    if options.check_only {
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let confirm_deletes = config.confirm_deletes() && !options.assume_yes;

    if options.demo {
        if options.command.needs_account() {
            bail!("`{}` needs a real backend; drop --demo", options.command.name());
        }
        let backend = FakeBackend::demo(DEMO_SEED);
        debug!(seed = DEMO_SEED, "using in-memory demo backend");
        return run_entity_command(
            &backend,
            &options.command,
            config.refresh_after_submit(),
            confirm_deletes,
            &mut out,
        );
    }

    match &options.command {
        Command::Login { name } => {
            let password = read_secret("Password")?;
            account::login(&client, &session_path, name, password, &mut out)
        }
        Command::Register { name, email } => {
            let password = read_secret("Password")?;
            let confirm = match env::var("DOCKET_PASSWORD") {
                Ok(_) => password.clone(),
                Err(_) => read_secret("Confirm password")?,
            };
            account::register(&client, name, email, password, confirm, &mut out)
        }
        Command::Logout => account::logout(&client, &session_path, &mut out),
        Command::Profile { fields } => account::profile(&client, fields, &mut out),
        Command::View(tab) => account::view(&client, *tab, &mut out),
        command => run_entity_command(
            &client,
            command,
            config.refresh_after_submit(),
            confirm_deletes,
            &mut out,
        ),
    }
}

fn run_entity_command<B: Backend>(
    backend: &B,
    command: &Command,
    refresh_after_submit: bool,
    confirm_deletes: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut runtime = Runtime::new(backend, refresh_after_submit);
    match command {
        Command::Dashboard => runtime.dashboard(out),
        Command::List(resource) => runtime.list(*resource, out),
        Command::Add { resource, fields } => runtime.add(*resource, fields, out),
        Command::Edit {
            resource,
            id,
            fields,
        } => runtime.edit(*resource, *id, fields, out),
        Command::Delete { resource, id } => {
            let mut confirm = |prompt: &str| !confirm_deletes || ask(prompt);
            runtime.delete(*resource, *id, &mut confirm, out)
        }
        other => bail!("`{}` is not an entity command", other.name()),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env("DOCKET_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Prompts on stderr and reads one line; anything but y/yes declines.
fn ask(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn read_secret(label: &str) -> Result<String> {
    if let Ok(password) = env::var("DOCKET_PASSWORD") {
        return Ok(password);
    }
    eprint!("{label}: ");
    io::stderr().flush().context("flush prompt")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Dashboard,
    List(Resource),
    Add {
        resource: Resource,
        fields: Vec<(String, String)>,
    },
    Edit {
        resource: Resource,
        id: i64,
        fields: Vec<(String, String)>,
    },
    Delete {
        resource: Resource,
        id: i64,
    },
    Login {
        name: String,
    },
    Register {
        name: String,
        email: String,
    },
    Logout,
    Profile {
        fields: Vec<(String, String)>,
    },
    View(ViewTab),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::List(_) => "list",
            Self::Add { .. } => "add",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
            Self::Login { .. } => "login",
            Self::Register { .. } => "register",
            Self::Logout => "logout",
            Self::Profile { .. } => "profile",
            Self::View(_) => "view",
        }
    }

    fn needs_account(&self) -> bool {
        matches!(
            self,
            Self::Login { .. }
                | Self::Register { .. }
                | Self::Logout
                | Self::Profile { .. }
                | Self::View(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    assume_yes: bool,
    command: Command,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
        assume_yes: false,
        command: Command::Dashboard,
    };

    let mut positional = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--yes" | "-y" => {
                options.assume_yes = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                bail!("unknown argument {flag:?}; run with --help to see supported options");
            }
            value => positional.push(value.to_owned()),
        }
    }

    if !positional.is_empty() {
        options.command = parse_command(&positional)?;
    }
    Ok(options)
}

fn parse_command(args: &[String]) -> Result<Command> {
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("missing command; run with --help"))?;
    let command = match name.as_str() {
        "dashboard" => {
            expect_arity(name, rest, 0)?;
            Command::Dashboard
        }
        "list" => {
            expect_arity(name, rest, 1)?;
            Command::List(parse_resource(&rest[0])?)
        }
        "add" => {
            let (resource, fields) = rest
                .split_first()
                .ok_or_else(|| anyhow!("add requires a resource, e.g. `docket add client name=Ada`"))?;
            Command::Add {
                resource: parse_resource(resource)?,
                fields: parse_assignments(fields)?,
            }
        }
        "edit" => {
            if rest.len() < 2 {
                bail!("edit requires a resource and an id, e.g. `docket edit case 3 status=Closed`");
            }
            Command::Edit {
                resource: parse_resource(&rest[0])?,
                id: parse_id(&rest[1])?,
                fields: parse_assignments(&rest[2..])?,
            }
        }
        "delete" => {
            expect_arity(name, rest, 2)?;
            Command::Delete {
                resource: parse_resource(&rest[0])?,
                id: parse_id(&rest[1])?,
            }
        }
        "login" => {
            expect_arity(name, rest, 1)?;
            Command::Login {
                name: rest[0].clone(),
            }
        }
        "register" => {
            expect_arity(name, rest, 2)?;
            Command::Register {
                name: rest[0].clone(),
                email: rest[1].clone(),
            }
        }
        "logout" => {
            expect_arity(name, rest, 0)?;
            Command::Logout
        }
        "profile" => Command::Profile {
            fields: parse_assignments(rest)?,
        },
        "view" => {
            expect_arity(name, rest, 1)?;
            let tab = ViewTab::parse(&rest[0]).ok_or_else(|| {
                anyhow!(
                    "unknown view {:?}; expected one of: {}",
                    rest[0],
                    ViewTab::ALL.map(ViewTab::label).join(", ")
                )
            })?;
            Command::View(tab)
        }
        unknown => {
            bail!("unknown command {unknown:?}; run with --help to see supported commands")
        }
    };
    Ok(command)
}

fn expect_arity(command: &str, rest: &[String], count: usize) -> Result<()> {
    if rest.len() != count {
        bail!(
            "`{command}` takes {count} argument(s), got {}; run with --help",
            rest.len()
        );
    }
    Ok(())
}

fn parse_resource(raw: &str) -> Result<Resource> {
    Resource::parse(raw).ok_or_else(|| {
        anyhow!(
            "unknown resource {raw:?}; expected one of: {}",
            Resource::ALL.map(Resource::label).join(", ")
        )
    })
}

fn parse_id(raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => bail!("invalid id {raw:?}; ids are positive integers"),
    }
}

fn parse_assignments(args: &[String]) -> Result<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            let (field, value) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("expected field=value, got {arg:?}"))?;
            let field = field.trim();
            if field.is_empty() {
                bail!("expected field=value, got {arg:?}");
            }
            Ok((field.to_owned(), value.to_owned()))
        })
        .collect()
}

fn print_help() {
    println!("docket - case management client");
    println!();
    println!("Usage: docket [options] [command]");
    println!();
    println!("Commands:");
    println!("  dashboard                          Show case and client counts (default)");
    println!("  list <resource>                    List clients|lawyers|cases|appointments|schedules");
    println!("  add <resource> field=value...      Create a record");
    println!("  edit <resource> <id> field=value...  Update a record");
    println!("  delete <resource> <id>             Delete a record after confirmation");
    println!("  login <name>                       Sign in (password from DOCKET_PASSWORD or prompt)");
    println!("  register <name> <email>            Create an admin account");
    println!("  logout                             Sign out and forget the saved session");
    println!("  profile [name=..] [email=..]       Show or update the signed-in admin");
    println!("  view <tab>                         all-appointments|cases|appointments|clients|lawyers");
    println!();
    println!("Options:");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Run entity commands against seeded in-memory data");
    println!("  --check                  Validate config and session, then exit");
    println!("  --yes, -y                Skip delete confirmation");
    println!("  --help                   Show this help");
}
