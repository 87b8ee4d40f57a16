use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::Context;
use arx_sdk::{
    Article, ArticleEdit, Catalog, CatalogConfig, ContentHasher, NewArticle, Registration, SortKey,
};
use colored::Colorize;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    if let Command::Hash(args) = &cli.command {
        return cmd_hash(args, format);
    }

    let config = resolve_config(&cli)?;
    debug!(database = %config.database.display(), articles = %config.articles_dir.display(), "opening catalog");
    let mut catalog = Catalog::open(&config)
        .with_context(|| format!("failed to open {}", config.database.display()))?;

    match cli.command {
        Command::Add(args) => cmd_add(&mut catalog, args, format),
        Command::Edit(args) => cmd_edit(&mut catalog, args, format),
        Command::Rm(args) => cmd_rm(&mut catalog, args, &mut io::stdin().lock()),
        Command::Ls(args) => cmd_ls(&catalog, args, format),
        Command::Search(args) => cmd_search(&catalog, args, format),
        Command::Show(args) => cmd_show(&catalog, args, format),
        Command::Cat(args) => cmd_cat(&catalog, args),
        Command::Fsck => cmd_fsck(&catalog, format),
        Command::Hash(_) => unreachable!("handled above"),
    }
}

/// The configuration file (or defaults) with command-line overrides applied.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<CatalogConfig> {
    let mut config = CatalogConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("failed to load config {}", path.display()),
        None => "failed to load default config".to_string(),
    })?;
    if let Some(db) = &cli.db {
        config.database = db.clone();
    }
    if let Some(dir) = &cli.articles_dir {
        config.articles_dir = dir.clone();
    }
    Ok(config)
}

fn cmd_add(catalog: &mut Catalog, args: AddArgs, format: OutputFormat) -> anyhow::Result<()> {
    let content = fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let registration = catalog.register(NewArticle::new(args.title, args.authors, args.year, content))?;

    if format == OutputFormat::Json {
        return print_json(&registration);
    }
    match registration {
        Registration::Created(article) => {
            println!("{} Registered {}", "✓".green().bold(), article.id.to_string().yellow());
            print_article(&article);
        }
        Registration::Duplicate(article) => {
            println!(
                "{} Already registered as {}",
                "!".yellow().bold(),
                article.id.to_string().yellow()
            );
            print_article(&article);
        }
    }
    Ok(())
}

fn cmd_edit(catalog: &mut Catalog, args: EditArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut edit = ArticleEdit::new();
    if let Some(title) = args.title {
        edit = edit.title(title);
    }
    if let Some(authors) = args.authors {
        edit = edit.contributors(authors);
    }
    if let Some(year) = args.year {
        edit = edit.year(year);
    }

    let id = args.id.trim();
    match catalog.edit(id, &edit)? {
        Some(article) if format == OutputFormat::Json => print_json(&article),
        Some(article) => {
            println!("{} Updated {}", "✓".green().bold(), article.id.to_string().yellow());
            print_article(&article);
            Ok(())
        }
        None => not_found(id),
    }
}

fn cmd_rm(catalog: &mut Catalog, args: RmArgs, input: &mut impl BufRead) -> anyhow::Result<()> {
    let id = args.id.trim();
    let Some(article) = catalog.get(id) else {
        return not_found(id);
    };
    if !args.yes {
        print_article(article);
        print!("Delete this article? [y/N] ");
        io::stdout().flush()?;
        if !confirmed(input)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(article) = catalog.remove(id)? {
        println!("{} Removed {}", "✓".green().bold(), article.id.to_string().yellow());
    }
    Ok(())
}

fn confirmed(input: &mut impl BufRead) -> io::Result<bool> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn cmd_ls(catalog: &Catalog, args: LsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let sort = match args.sort {
        SortArg::Title => SortKey::Title,
        SortArg::Authors => SortKey::Contributors,
    };
    print_articles(&catalog.list(sort), format)
}

fn cmd_search(catalog: &Catalog, args: SearchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let found = match (&args.author, &args.year) {
        (Some(author), _) => catalog.by_contributor(author),
        (None, Some(year)) => catalog.by_year(year),
        (None, None) => anyhow::bail!("search needs --author or --year"),
    };
    print_articles(&found, format)
}

fn cmd_show(catalog: &Catalog, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = args.id.trim();
    match catalog.get(id) {
        Some(article) if format == OutputFormat::Json => print_json(article),
        Some(article) => {
            print_article(article);
            Ok(())
        }
        None => not_found(id),
    }
}

fn cmd_cat(catalog: &Catalog, args: CatArgs) -> anyhow::Result<()> {
    let id = args.id.trim();
    match catalog.payload(id)? {
        Some(data) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
            Ok(())
        }
        None => not_found(id),
    }
}

fn cmd_hash(args: &HashArgs, format: OutputFormat) -> anyhow::Result<()> {
    let content = fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let id = ContentHasher::hash_content(&content);
    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "file": args.file.display().to_string(), "id": id }));
    }
    println!("{}  {}", id.to_string().yellow(), args.file.display());
    Ok(())
}

fn cmd_fsck(catalog: &Catalog, format: OutputFormat) -> anyhow::Result<()> {
    let report = catalog.fsck()?;
    if format == OutputFormat::Json {
        print_json(&report)?;
    } else if report.is_clean() {
        println!("{} No issues ({} articles).", "✓".green().bold(), catalog.len());
    } else {
        for problem in &report.inconsistencies {
            println!("  {} {}", "index:".red(), problem);
        }
        for id in &report.missing_payloads {
            println!("  {} {}", "missing payload:".red(), id);
        }
        for id in &report.mismatched_payloads {
            println!("  {} {}", "hash mismatch:".red(), id);
        }
    }
    if !report.is_clean() {
        anyhow::bail!("fsck found problems");
    }
    Ok(())
}

fn not_found(id: &str) -> anyhow::Result<()> {
    println!("No article with id {}.", id.yellow());
    Ok(())
}

fn print_article(article: &Article) {
    println!("{}  {}", article.id.to_string().yellow().bold(), article.title.bold());
    println!("  Authors: {}", article.contributors);
    println!("  Year:    {}", article.year);
    println!("  Payload: {}", article.payload_key.dimmed());
}

fn print_articles(articles: &[&Article], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(&articles);
    }
    if articles.is_empty() {
        println!("No articles.");
        return Ok(());
    }
    for article in articles {
        println!(
            "{}  {} ({}) {}",
            article.id.to_string().yellow(),
            article.title.bold(),
            article.year,
            article.contributors.dimmed()
        );
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    fn cli(dir: &Path, args: &[&str]) -> Cli {
        let db = dir.join("db.txt");
        let articles = dir.join("articles");
        let mut argv = vec![
            "arx".to_string(),
            "--db".into(),
            db.display().to_string(),
            "--articles-dir".into(),
            articles.display().to_string(),
        ];
        argv.extend(args.iter().map(|s| s.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    fn open(dir: &Path) -> Catalog {
        let parsed = cli(dir, &["ls"]);
        Catalog::open(&resolve_config(&parsed).unwrap()).unwrap()
    }

    fn add_file(dir: &Path, name: &str, body: &str, title: &str, authors: &str, year: &str) {
        let file = dir.join(name);
        fs::write(&file, body).unwrap();
        let file = file.display().to_string();
        run_command(cli(
            dir,
            &["add", &file, "--title", title, "--authors", authors, "--year", year],
        ))
        .unwrap();
    }

    #[test]
    fn overrides_replace_config_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("arx.toml");
        fs::write(&config_path, "database = \"from-file.txt\"\npayload_extension = \"md\"\n").unwrap();

        let parsed = Cli::try_parse_from([
            "arx",
            "--config",
            config_path.to_str().unwrap(),
            "--articles-dir",
            "/srv/blobs",
            "ls",
        ])
        .unwrap();
        let config = resolve_config(&parsed).unwrap();
        assert_eq!(config.database, Path::new("from-file.txt"));
        assert_eq!(config.articles_dir, Path::new("/srv/blobs"));
        assert_eq!(config.payload_extension, "md");
    }

    #[test]
    fn add_then_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        add_file(dir.path(), "a.txt", "body", "T1", "Alice, Bob", "2020");
        add_file(dir.path(), "b.txt", "body", "Copy", "Carol", "2021");

        let catalog = open(dir.path());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.by_contributor("Bob").len(), 1);
        assert!(catalog.by_contributor("Carol").is_empty());
    }

    #[test]
    fn edit_and_rm_with_yes() {
        let dir = tempfile::tempdir().unwrap();
        add_file(dir.path(), "a.txt", "body", "T1", "Alice", "2020");
        let id = ContentHasher::hash_text("body").to_string();

        run_command(cli(dir.path(), &["edit", &id, "--year", "2022"])).unwrap();
        assert_eq!(open(dir.path()).get(&id).unwrap().year, "2022");

        run_command(cli(dir.path(), &["rm", &id, "--yes"])).unwrap();
        assert!(open(dir.path()).is_empty());
    }

    #[test]
    fn rm_declined_keeps_article() {
        let dir = tempfile::tempdir().unwrap();
        add_file(dir.path(), "a.txt", "body", "T1", "Alice", "2020");
        let id = ContentHasher::hash_text("body").to_string();

        let mut catalog = open(dir.path());
        let args = RmArgs { id: id.clone(), yes: false };
        cmd_rm(&mut catalog, args, &mut "n\n".as_bytes()).unwrap();
        assert!(catalog.get(&id).is_some());

        let args = RmArgs { id: id.clone(), yes: false };
        cmd_rm(&mut catalog, args, &mut "YES\n".as_bytes()).unwrap();
        assert!(catalog.get(&id).is_none());
    }

    #[test]
    fn id_arguments_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        add_file(dir.path(), "a.txt", "body", "T1", "Alice", "2020");
        let id = ContentHasher::hash_text("body").to_string();
        let padded = format!("  {id}\n");

        run_command(cli(dir.path(), &["edit", &padded, "--title", "Trimmed"])).unwrap();
        assert_eq!(open(dir.path()).get(&id).unwrap().title, "Trimmed");

        run_command(cli(dir.path(), &["show", &padded])).unwrap();
        run_command(cli(dir.path(), &["cat", &padded])).unwrap();

        run_command(cli(dir.path(), &["rm", &padded, "--yes"])).unwrap();
        assert!(open(dir.path()).is_empty());
    }

    #[test]
    fn unknown_id_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        run_command(cli(dir.path(), &["show", "ffff"])).unwrap();
        run_command(cli(dir.path(), &["edit", "ffff", "--title", "X"])).unwrap();
        run_command(cli(dir.path(), &["rm", "ffff", "--yes"])).unwrap();
        run_command(cli(dir.path(), &["cat", "ffff"])).unwrap();
    }

    #[test]
    fn add_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt").display().to_string();
        let result = run_command(cli(
            dir.path(),
            &["add", &missing, "--title", "T", "--authors", "A", "--year", "2020"],
        ));
        assert!(result.is_err());
    }

    #[test]
    fn fsck_fails_on_missing_payload() {
        let dir = tempfile::tempdir().unwrap();
        add_file(dir.path(), "a.txt", "body", "T1", "Alice", "2020");
        run_command(cli(dir.path(), &["fsck"])).unwrap();

        let id = ContentHasher::hash_text("body");
        fs::remove_file(dir.path().join("articles").join(format!("{id}.txt"))).unwrap();
        assert!(run_command(cli(dir.path(), &["fsck"])).is_err());
    }

    #[test]
    fn confirmation_answers() {
        assert!(confirmed(&mut "y\n".as_bytes()).unwrap());
        assert!(confirmed(&mut " Yes \n".as_bytes()).unwrap());
        assert!(!confirmed(&mut "\n".as_bytes()).unwrap());
        assert!(!confirmed(&mut "".as_bytes()).unwrap());
        assert!(!confirmed(&mut "nope\n".as_bytes()).unwrap());
    }
}
