//! Basic example demonstrating the Zendesk API client.
//!
//! Run with:
//! ```
//! ZENDESK_SUBDOMAIN=acme ZENDESK_EMAIL=agent@acme.com ZENDESK_API_TOKEN=... \
//!     cargo run --example basic
//! ```

use std::time::Duration;

use zendesk::{
    search, Context, Get, List, PaginationOptions, SearchOptions, Ticket, TicketDates, User,
    ZendeskClient,
};

#[tokio::main]
async fn main() -> zendesk::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Zendesk client...");
    let client = ZendeskClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // Give the whole session two minutes
    let ctx = Context::background().with_timeout(Duration::from_secs(120));

    // Walk the first two pages of agents
    println!("\n--- Listing Agents (cursor pagination) ---");
    let agent_opts = User::with_role(PaginationOptions::new().page_size(10), "agent");
    let mut agents = User::iter(&client, &ctx, agent_opts);
    let mut pages = 0;
    while agents.has_more() && pages < 2 {
        for user in agents.get_next().await? {
            println!("  - {} <{}>", user.name, user.email);
        }
        pages += 1;
    }

    // Most recently updated tickets, offset style
    println!("\n--- Recent Tickets (offset pagination) ---");
    let mut tickets = Ticket::iter(
        &client,
        &ctx,
        PaginationOptions::new()
            .page_size(5)
            .offset()
            .sort_by("updated_at")
            .sort_order(zendesk::SortOrder::Desc),
    );
    let recent = tickets.get_next().await?;
    for ticket in &recent {
        println!("  #{} [{}] {}", ticket.id, ticket.status, ticket.subject);
    }

    // Ticket details with sideloaded dates
    if let Some(first) = recent.first() {
        println!("\n--- Ticket Details ---");
        let mut dates = TicketDates::default();
        let ticket = Ticket::get_with_sideloads(
            &client,
            &ctx,
            first.id,
            &mut [TicketDates::sideload(&mut dates)],
        )
        .await?;
        println!("Ticket #{}: {}", ticket.id, ticket.subject);
        println!("  Priority: {}", ticket.priority);
        println!("  Tags: {}", ticket.tags.join(", "));
        println!("  Assigned at: {:?}", dates.assigned_at);
        println!("  Solved at: {:?}", dates.solved_at);

        if let Some(requester_id) = ticket.requester_id {
            let requester = User::get(&client, &ctx, requester_id).await?;
            println!("  Requester: {} <{}>", requester.name, requester.email);
        }
    }

    // Unified search returns tickets, users, organizations and groups together
    println!("\n--- Search ---");
    let (results, page) = search(&client, &ctx, &SearchOptions::new("status:open")).await?;
    println!("{} hits in total", page.count);
    for hit in results.iter().take(5) {
        println!("  {}", hit.result_type());
    }

    println!("\nDone!");
    Ok(())
}
