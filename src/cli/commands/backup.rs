use crate::config::Config;
use crate::domain::UserId;
use crate::state::SharedState;

pub async fn cmd_backup(config: Config) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    let result = state.backup_service.create_backup(UserId::SYSTEM).await;
    state.audit.flush().await;

    let path = result?;
    println!("✓ Backup written to {}", path.display());

    Ok(())
}
