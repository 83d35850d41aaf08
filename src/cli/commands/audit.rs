use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_audit(config: Config, limit: usize) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let entries = state.audit.find_all().await?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    let shown = entries.len().min(limit);
    println!("Recent Activity (last {shown}):");
    println!("{:-<70}", "");

    for entry in entries.into_iter().take(limit) {
        let actor = entry
            .user_name
            .unwrap_or_else(|| format!("System (ID: {})", entry.user_id));
        println!("• {} - {}", entry.action, actor);
        println!("  {} | {}", entry.timestamp, entry.detail);
    }

    Ok(())
}
