//! Zendesk API CLI binary.
//!
//! A command-line interface for browsing a Zendesk Support account.

use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;
use zendesk::cli::{Cli, Command, Entity};
use zendesk::output::PrettyPrint;
use zendesk::{
    search, Context, Get, Group, List, Macro, Organization, PageIterator, PaginationOptions,
    SearchOptions, SearchResult, Ticket, Trigger, User, Webhook, ZendeskClient, ZendeskError,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match ZendeskClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set ZENDESK_SUBDOMAIN and ZENDESK_EMAIL + ZENDESK_API_TOKEN");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &ZendeskClient, cli: Cli) -> zendesk::Result<()> {
    let ctx = Context::background();
    match cli.command {
        Command::Get { entity, id } => handle_get(client, &ctx, entity, &id, cli.json).await,
        Command::List {
            entity,
            page_size,
            offset,
            limit_pages,
            sort,
        } => {
            let mut opts = PaginationOptions::new().page_size(page_size);
            if offset {
                opts = opts.offset();
                if let Some(sort) = sort {
                    opts = opts.sort_by(sort);
                }
            } else if let Some(sort) = sort {
                opts = opts.sort(sort);
            }
            handle_list(client, &ctx, entity, opts, limit_pages, cli.json).await
        }
        Command::Search { query, page } => {
            let mut opts = SearchOptions::new(query);
            opts.page.page = page.unwrap_or(0);
            handle_search(client, &ctx, &opts, cli.json).await
        }
    }
}

fn parse_id(id: &str) -> zendesk::Result<i64> {
    id.parse()
        .map_err(|_| ZendeskError::Options(format!("{id} is not a numeric id")))
}

async fn handle_get(
    client: &ZendeskClient,
    ctx: &Context,
    entity: Entity,
    id: &str,
    json: bool,
) -> zendesk::Result<()> {
    match entity {
        Entity::Ticket => output_single(&Ticket::get(client, ctx, parse_id(id)?).await?, json)?,
        Entity::User => output_single(&User::get(client, ctx, parse_id(id)?).await?, json)?,
        Entity::Organization => {
            output_single(&Organization::get(client, ctx, parse_id(id)?).await?, json)?
        }
        Entity::Group => output_single(&Group::get(client, ctx, parse_id(id)?).await?, json)?,
        Entity::Trigger => output_single(&Trigger::get(client, ctx, parse_id(id)?).await?, json)?,
        Entity::Macro => output_single(&Macro::get(client, ctx, parse_id(id)?).await?, json)?,
        Entity::Webhook => {
            output_single(&Webhook::get(client, ctx, id.to_string()).await?, json)?
        }
    }
    Ok(())
}

async fn handle_list(
    client: &ZendeskClient,
    ctx: &Context,
    entity: Entity,
    opts: PaginationOptions,
    limit_pages: Option<usize>,
    json: bool,
) -> zendesk::Result<()> {
    match entity {
        Entity::Ticket => {
            let iter = Ticket::iter(client, ctx, opts);
            output_pages(iter, limit_pages, json, |t| TicketRow::from(t)).await
        }
        Entity::User => {
            let iter = User::iter(client, ctx, opts);
            output_pages(iter, limit_pages, json, |u| UserRow::from(u)).await
        }
        Entity::Organization => {
            let iter = Organization::iter(client, ctx, opts);
            output_pages(iter, limit_pages, json, |o| NamedRow::from(o)).await
        }
        Entity::Group => {
            let iter = Group::iter(client, ctx, opts);
            output_pages(iter, limit_pages, json, |g| NamedRow::from(g)).await
        }
        Entity::Trigger => {
            let iter = Trigger::iter(client, ctx, opts);
            output_pages(iter, limit_pages, json, |t| RuleRow::from(t)).await
        }
        Entity::Macro => {
            let iter = Macro::iter(client, ctx, opts);
            output_pages(iter, limit_pages, json, |m| RuleRow::from(m)).await
        }
        Entity::Webhook => {
            eprintln!("Hint: Use 'zendesk get webhook <id>'");
            Err(ZendeskError::Options(
                "webhooks can only be retrieved individually".to_string(),
            ))
        }
    }
}

async fn handle_search(
    client: &ZendeskClient,
    ctx: &Context,
    opts: &SearchOptions,
    json: bool,
) -> zendesk::Result<()> {
    let (results, page) = search(client, ctx, opts).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let rows: Vec<SearchRow> = results.iter().map(SearchRow::from).collect();
    println!("{}", Table::new(rows));
    if page.has_next() {
        println!("\n{} total results (more available)", page.count);
    } else {
        println!("\n{} total results", page.count);
    }
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> zendesk::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

async fn output_pages<T, R, F>(
    mut iter: PageIterator<T>,
    limit_pages: Option<usize>,
    json: bool,
    to_row: F,
) -> zendesk::Result<()>
where
    T: Serialize + Send + 'static,
    R: Tabled,
    F: Fn(&T) -> R,
{
    let mut items = Vec::new();
    let mut pages = 0;

    while iter.has_more() {
        if limit_pages.is_some_and(|limit| pages >= limit) {
            break;
        }
        items.extend(iter.get_next().await?);
        pages += 1;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        if iter.has_more() {
            println!("\n{} items from {} pages (more available)", items.len(), pages);
        } else {
            println!("\n{} items from {} pages (end)", items.len(), pages);
        }
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct TicketRow {
    id: i64,
    status: String,
    priority: String,
    subject: String,
}

impl From<&Ticket> for TicketRow {
    fn from(t: &Ticket) -> Self {
        Self {
            id: t.id,
            status: t.status.clone(),
            priority: t.priority.clone(),
            subject: t.subject.clone(),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.clone(),
        }
    }
}

#[derive(Tabled)]
struct NamedRow {
    id: i64,
    name: String,
}

impl From<&Organization> for NamedRow {
    fn from(o: &Organization) -> Self {
        Self {
            id: o.id,
            name: o.name.clone(),
        }
    }
}

impl From<&Group> for NamedRow {
    fn from(g: &Group) -> Self {
        Self {
            id: g.id,
            name: g.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct RuleRow {
    id: i64,
    title: String,
    active: bool,
    actions: usize,
}

impl From<&Trigger> for RuleRow {
    fn from(t: &Trigger) -> Self {
        Self {
            id: t.id,
            title: t.title.clone(),
            active: t.active,
            actions: t.actions.len(),
        }
    }
}

impl From<&Macro> for RuleRow {
    fn from(m: &Macro) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            active: m.active,
            actions: m.actions.len(),
        }
    }
}

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "type")]
    result_type: String,
    id: i64,
    summary: String,
}

impl From<&SearchResult> for SearchRow {
    fn from(r: &SearchResult) -> Self {
        let (id, summary) = match r {
            SearchResult::Ticket(t) => (t.id, t.subject.clone()),
            SearchResult::User(u) => (u.id, u.name.clone()),
            SearchResult::Organization(o) => (o.id, o.name.clone()),
            SearchResult::Group(g) => (g.id, g.name.clone()),
            SearchResult::Topic(t) => (t.id, t.name.clone()),
        };
        Self {
            result_type: r.result_type().to_string(),
            id,
            summary,
        }
    }
}
