use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use iconize_core::config::Config;
use iconize_core::{
    CustomRule, EntryKind, IconStore, IconizeError, Result, RuleApplier, RuleResolver, RuleSet,
    ScopeKind, DEFAULT_MIGRATION_TABLE,
};

mod args;
mod tree;
use args::{Cli, Commands, ConfigAction, Kind, RuleAction, Scope, Shell};
use tree::{DirectoryTree, StoreRenderer};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);

    let result = match cli.command {
        Commands::Resolve { path, kind } => handle_resolve(&base_dir, &path, kind),
        Commands::Apply {
            root,
            rule,
            dry_run,
        } => handle_apply(&base_dir, &root, rule, dry_run),
        Commands::Migrate { dry_run, force } => handle_migrate(&base_dir, dry_run, force),
        Commands::Rule { action } => handle_rule(action, &base_dir),
        Commands::Config { action } => handle_config(action, &base_dir),
        Commands::Completions { shell } => {
            handle_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code().clamp(1, 255) as u8)
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "iconize", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("ICONIZE_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".iconize"))
        .unwrap_or_else(|| PathBuf::from(".iconize"))
}

fn load_store(base_dir: &Path) -> Result<(Config, PathBuf, IconStore)> {
    let config = Config::load(base_dir)?;
    let data_path = config.data_path(base_dir);
    let store = IconStore::load(&data_path)?;
    Ok((config, data_path, store))
}

fn describe(rule: &CustomRule) -> String {
    let color = rule
        .color
        .as_deref()
        .map(|c| format!(" {}", c.dimmed()))
        .unwrap_or_default();
    format!(
        "{} -> {}{} ({})",
        rule.rule.cyan(),
        rule.icon.bold(),
        color,
        rule.scope
    )
}

fn handle_resolve(base_dir: &Path, path: &str, kind: Option<Kind>) -> Result<()> {
    let (config, _, store) = load_store(base_dir)?;
    let rules = store.rules();
    let resolver = RuleResolver::new(&rules).with_options(config.resolve_options());

    let found = match kind {
        Some(kind) => resolver.resolve_entry(path, entry_kind(kind)),
        None => resolver.find_first_matching_rule(path),
    };

    match found {
        Some(m) => println!("[{}] {}", m.index, describe(m.rule)),
        None => println!("No rule matches {}", path.yellow()),
    }
    Ok(())
}

fn handle_apply(base_dir: &Path, root: &Path, rule: Option<usize>, dry_run: bool) -> Result<()> {
    let (config, data_path, store) = load_store(base_dir)?;
    let rules = store.rules();
    let tree = DirectoryTree::scan(root)?;
    let mut renderer = StoreRenderer::new(store);

    let result = match rule {
        Some(index) => {
            let rule = rules.get(index).ok_or(IconizeError::RuleIndexOutOfRange {
                index,
                len: rules.len(),
            })?;
            RuleApplier::new(&tree, &tree, &mut renderer).apply_to_file(rule, None)
        }
        None => {
            let resolver = RuleResolver::new(&rules).with_options(config.resolve_options());
            RuleApplier::new(&tree, &tree, &mut renderer).apply_rule_set(&resolver)
        }
    };

    println!();
    for (path, icon, color) in renderer.assigned() {
        let color = color
            .as_deref()
            .map(|c| format!(" {}", c.dimmed()))
            .unwrap_or_default();
        println!("  {} {} -> {}{}", "+".green(), path, icon.bold(), color);
    }
    println!();
    println!(
        "{} assigned, {} already set, {} unmatched ({} entries)",
        result.applied_count().to_string().green(),
        result.already_iconed,
        result.unmatched,
        tree.len()
    );

    if dry_run {
        println!("{}", "Dry run: nothing saved.".yellow());
        return Ok(());
    }
    if result.applied_count() > 0 {
        renderer.into_store().save(&data_path)?;
        println!("{} {}", "Saved:".green(), data_path.display());
    }
    Ok(())
}

fn handle_migrate(base_dir: &Path, dry_run: bool, force: bool) -> Result<()> {
    let (_, data_path, store) = load_store(base_dir)?;

    if store.is_migrated() && !force {
        println!("Already migrated. Use --force to run again.");
        return Ok(());
    }

    let (migrated, report) = store.migrate(DEFAULT_MIGRATION_TABLE, force);

    println!();
    for entry in &report.rewritten {
        println!(
            "  {}: {} -> {}",
            entry.key,
            entry.from.red(),
            entry.to.green()
        );
    }
    if !report.changed() {
        println!("No legacy icon identifiers found.");
    }
    println!();

    if dry_run {
        println!("{}", "Dry run: nothing saved.".yellow());
        return Ok(());
    }
    migrated.save(&data_path)?;
    println!(
        "{} {} ({} rewritten)",
        "Migrated:".green(),
        data_path.display(),
        report.rewritten.len()
    );
    Ok(())
}

fn handle_rule(action: RuleAction, base_dir: &Path) -> Result<()> {
    let (_, data_path, store) = load_store(base_dir)?;
    let rules = store.rules();

    let (updated, message): (RuleSet, String) = match action {
        RuleAction::List => {
            if rules.is_empty() {
                println!("No rules found.");
                println!();
                println!("Create one with: iconize rule add <pattern> <icon>");
                return Ok(());
            }

            println!();
            for (index, rule) in rules.iter().enumerate() {
                println!("  [{}] {}", index, describe(rule));
            }
            println!();
            return Ok(());
        }
        RuleAction::Add {
            pattern,
            icon,
            color,
            scope,
            at,
        } => {
            let rule = CustomRule::new(pattern, icon, color, scope_kind(scope))?;
            let message = format!("{} {}", "Added:".green(), describe(&rule));
            (add_rule(&rules, rule, at)?, message)
        }
        RuleAction::Remove { index } => {
            let (updated, removed) = rules.without(index)?;
            (updated, format!("{} {}", "Removed:".green(), describe(&removed)))
        }
        RuleAction::Move { from, to } => {
            let updated = rules.moved(from, to)?;
            (updated, format!("{} [{}] -> [{}]", "Moved:".green(), from, to))
        }
    };

    store.with_rules(&updated).save(&data_path)?;
    println!("{}", message);
    Ok(())
}

fn add_rule(rules: &RuleSet, rule: CustomRule, at: Option<usize>) -> Result<RuleSet> {
    match at {
        Some(index) => rules.with_rule_at(index, rule),
        None => Ok(rules.with_rule(rule)),
    }
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(IconizeError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

fn entry_kind(kind: Kind) -> EntryKind {
    match kind {
        Kind::File => EntryKind::File,
        Kind::Folder => EntryKind::Folder,
    }
}

fn scope_kind(scope: Scope) -> ScopeKind {
    match scope {
        Scope::Everything => ScopeKind::Everything,
        Scope::Files => ScopeKind::Files,
        Scope::Folders => ScopeKind::Folders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str) -> CustomRule {
        CustomRule::new(pattern, "FasStar", None, ScopeKind::Everything).unwrap()
    }

    #[test]
    fn test_add_rule_appends_or_inserts() {
        let rules = RuleSet::new(vec![rule("a")]);

        let appended = add_rule(&rules, rule("b"), None).unwrap();
        assert_eq!(appended.get(1).unwrap().rule, "b");

        let inserted = add_rule(&rules, rule("c"), Some(0)).unwrap();
        assert_eq!(inserted.get(0).unwrap().rule, "c");
    }

    #[test]
    fn test_add_rule_out_of_range_fails_before_any_change() {
        let rules = RuleSet::new(vec![rule("a")]);
        assert!(matches!(
            add_rule(&rules, rule("b"), Some(99)),
            Err(IconizeError::RuleIndexOutOfRange { index: 99, len: 1 })
        ));
        assert_eq!(rules.len(), 1);
    }
}
