//! Mechanize CLI
//!
//! Runs a selector against an HTML document and prints what it matched.
//!
//! - `mechanize 'li.nav-item' page.html`      # list matches
//! - `mechanize --tokens --chain '#main p'`   # inspect the selector only
//! - `mechanize --forms '#password' page.html` # find the enclosing form

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mechanize_dom::{DomTree, ElementData, NodeId};
use mechanize_html::{parse_document, print_tree};
use mechanize_query::{
    Chain, MatchOptions, find_all_with, find_form, tokenize, try_compile,
};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Mechanize: locate elements and forms in HTML with a small selector language
#[derive(Parser, Debug)]
#[command(name = "mechanize")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"SELECTORS:
    name          element by tag name (lowercase)
    *             any element
    .class        any element whose class attribute contains "class"
    name.class    both of the above
    #id           element with that exact id
    a b           b at or below a match of a

EXAMPLES:
    # Every navigation item
    mechanize 'li.header-nav-item' page.html

    # Only the paragraphs inside the readme, not the readme itself
    mechanize --strict '#readme p' page.html

    # Machine-readable output
    mechanize --json 'a' --html '<a href="/x">x</a>'

    # Show how a selector is tokenized and compiled
    mechanize --tokens --chain 'div.note #intro'

    # Find the form containing the password field
    mechanize --forms '#password' login.html
"#)]
struct Cli {
    /// Selector to evaluate
    #[arg(value_name = "SELECTOR")]
    selector: String,

    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Report only elements matching the last term of the selector
    #[arg(long)]
    strict: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Print the token stream of the selector
    #[arg(long)]
    tokens: bool,

    /// Print the compiled term chain
    #[arg(long)]
    chain: bool,

    /// Look up the form containing a match instead of listing matches
    #[arg(long)]
    forms: bool,

    /// Dump the parsed DOM tree before querying
    #[arg(long)]
    tree: bool,
}

impl Cli {
    const fn options(&self) -> MatchOptions {
        if self.strict {
            MatchOptions::strict()
        } else {
            MatchOptions::inclusive()
        }
    }

    const fn has_document(&self) -> bool {
        self.path.is_some() || self.html.is_some()
    }
}

/// One matched element as printed by `--json`.
#[derive(Serialize)]
struct MatchRecord<'a> {
    node: usize,
    tag: &'a str,
    attributes: Vec<AttributeRecord<'a>>,
}

#[derive(Serialize)]
struct AttributeRecord<'a> {
    name: &'a str,
    value: &'a str,
}

impl<'a> MatchRecord<'a> {
    fn new(node: NodeId, element: &'a ElementData) -> Self {
        Self {
            node: node.0,
            tag: &element.tag_name,
            attributes: element
                .attrs
                .iter()
                .map(|attr| AttributeRecord {
                    name: &attr.name,
                    value: &attr.value,
                })
                .collect(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.tokens {
        print_tokens(&cli)?;
    }

    let chain = try_compile(&cli.selector)?;

    if cli.chain {
        print_chain(&cli, &chain)?;
    }

    if !cli.has_document() {
        if cli.tokens || cli.chain {
            return Ok(());
        }
        anyhow::bail!("Querying requires a file path or --html");
    }

    let tree = load_tree(&cli)?;

    if cli.tree {
        println!("{}", "=== DOM Tree ===".bold());
        print_tree(&tree, tree.root(), 0);
        println!();
    }

    if cli.forms {
        let form = find_form(&tree, &cli.selector)?;
        print_matches(&cli, &tree, &[form])
    } else {
        let selection = find_all_with(&tree, &chain, cli.options());
        print_matches(&cli, &tree, selection.nodes())
    }
}

/// Load the document from CLI arguments
fn load_tree(cli: &Cli) -> Result<DomTree> {
    if let Some(ref html) = cli.html {
        return Ok(parse_document(html));
    }
    let Some(ref path) = cli.path else {
        anyhow::bail!("Querying requires a file path or --html");
    };
    let html = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_document(&html))
}

fn print_tokens(cli: &Cli) -> Result<()> {
    let tokens = tokenize(&cli.selector);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    println!("{}", "=== Tokens ===".bold());
    for token in &tokens {
        println!(
            "{:>4}  {:<18} {:?}",
            token.position.dimmed(),
            token.kind.cyan(),
            token.text
        );
    }
    println!();
    Ok(())
}

fn print_chain(cli: &Cli, chain: &Chain) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(chain)?);
        return Ok(());
    }

    println!("{}", "=== Chain ===".bold());
    for (i, term) in chain.iter().enumerate() {
        println!("{:>4}  {}", i.dimmed(), term.green());
    }
    println!();
    Ok(())
}

fn print_matches(cli: &Cli, tree: &DomTree, nodes: &[NodeId]) -> Result<()> {
    let records: Vec<MatchRecord<'_>> = nodes
        .iter()
        .filter_map(|&id| tree.as_element(id).map(|element| MatchRecord::new(id, element)))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "no matches".yellow());
        return Ok(());
    }

    for record in &records {
        let attrs: Vec<String> = record
            .attributes
            .iter()
            .map(|attr| format!("{}=\"{}\"", attr.name, attr.value))
            .collect();
        if attrs.is_empty() {
            println!("{:>6}  <{}>", record.node.dimmed(), record.tag.cyan());
        } else {
            println!(
                "{:>6}  <{} {}>",
                record.node.dimmed(),
                record.tag.cyan(),
                attrs.join(" ")
            );
        }
    }
    println!("{}", format!("{} match(es)", records.len()).bold());
    Ok(())
}
