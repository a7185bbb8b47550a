use std::{env, path::PathBuf, process};

use chrono::{Local, NaiveDate};
use colored::Colorize;

use daybook_core::{
    config::SettingsManager,
    core::{services::SummaryService, utils::PathResolver},
    domain::Workspace,
    init,
    storage::{JsonStore, RecordStore},
};

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

struct Options {
    data: Option<PathBuf>,
    as_of: NaiveDate,
    json: bool,
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| {
        print_usage();
        process::exit(1);
    });

    match command.as_str() {
        "summary" => {
            let options = parse_options(args)?;
            let base = PathResolver::base_dir();
            let workspace = load_workspace(&options, &base)?;
            let goal = SettingsManager::with_base_dir(base)?.load().weight_goal;
            let dashboard = SummaryService::dashboard(&workspace, options.as_of, goal.as_ref());
            if options.json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
                return Ok(());
            }

            println!("{}", format!("Daybook summary for {}", dashboard.as_of).bold());
            println!(
                "Tasks: {} total, {} done, {} overdue, {} due today",
                dashboard.tasks.total,
                dashboard.tasks.done,
                dashboard.tasks.overdue,
                dashboard.tasks.due_today
            );
            println!(
                "Habits: {} active, {} done today, best streak {}",
                dashboard.habits.active,
                dashboard.habits.completed_today,
                dashboard.habits.best_current_streak
            );
            println!(
                "Finances ({}): income {:.2}, expenses {:.2}, balance {:.2}",
                dashboard.month,
                dashboard.finances.total_income,
                dashboard.finances.total_expenses,
                dashboard.finances.balance
            );
            for budget in &dashboard.budgets {
                let name = budget
                    .category
                    .as_ref()
                    .map(|c| c.name.as_str())
                    .unwrap_or("Uncategorized");
                let line = format!(
                    "  {name}: {:.2} of {:.2} ({:.0}%)",
                    budget.spent, budget.budget.limit, budget.percentage
                );
                if budget.is_over_budget {
                    println!("{} {}", line.red(), "over budget".red().bold());
                } else {
                    println!("{}", line.green());
                }
            }
            if let Some(current) = dashboard.weight.current {
                println!(
                    "Weight: {current:.1} kg ({:+.1} over 7 days)",
                    dashboard.weight.variation_7d
                );
            }
            println!(
                "Level {} ({} XP, next at {}), streak {} days",
                dashboard.level.level,
                dashboard.level.xp,
                dashboard.level.next_level_at,
                dashboard.streak.current
            );
        }
        "streaks" => {
            let options = parse_options(args)?;
            let workspace = load_workspace(&options, &PathResolver::base_dir())?;
            if workspace.habits.is_empty() {
                println!("No habits recorded.");
            }
            for habit in workspace.habits.iter().filter(|h| !h.is_archived()) {
                let streak = habit.streak(options.as_of);
                println!(
                    "{}: current {}, longest {}",
                    habit.title.bold(),
                    streak.current,
                    streak.longest
                );
            }
        }
        "version" => {
            println!("daybook_cli {}", env!("CARGO_PKG_VERSION"));
            println!("build {}", env!("DAYBOOK_BUILD_HASH"));
            println!("built {}", env!("DAYBOOK_BUILD_TIMESTAMP"));
            println!(
                "target {} ({})",
                env!("DAYBOOK_BUILD_TARGET"),
                env!("DAYBOOK_BUILD_PROFILE")
            );
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }

    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options {
        data: None,
        as_of: Local::now().date_naive(),
        json: false,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => {
                let path = args.next().ok_or("--data expects a path")?;
                options.data = Some(PathBuf::from(path));
            }
            "--as-of" => {
                let raw = args.next().ok_or("--as-of expects a date")?;
                options.as_of = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| format!("invalid date `{raw}`, expected YYYY-MM-DD"))?;
            }
            "--json" => options.json = true,
            other => return Err(format!("unknown option `{other}`").into()),
        }
    }
    Ok(options)
}

fn load_workspace(
    options: &Options,
    base: &std::path::Path,
) -> Result<Workspace, Box<dyn std::error::Error>> {
    let store = match &options.data {
        Some(path) => JsonStore::new(path.clone()),
        None => JsonStore::in_dir(base),
    };
    Ok(store.load()?)
}

fn print_usage() {
    eprintln!(
        "Usage: daybook_cli <command>\n\
         Commands:\n  \
         summary [--data <records.json>] [--as-of YYYY-MM-DD] [--json]\n  \
         streaks [--data <records.json>] [--as-of YYYY-MM-DD]\n  \
         version"
    );
}
