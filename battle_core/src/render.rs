//! Plain-text rendering helpers consumed by the presentation layer

use crate::combatant::Combatant;

/// Emoji HP bar with a ceiling percentage readout
pub fn hp_bar(current: i32, max: i32, width: usize) -> String {
    let ratio = if max > 0 {
        (current as f64 / max as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    let pct = ((ratio * 100.0).ceil() as i32).max(0);
    format!("{}{} {}%", "🟩".repeat(filled), "⬜".repeat(empty), pct)
}

/// Bullet list of a team with rarity and HP
pub fn team_list(team: &[Combatant]) -> String {
    team.iter()
        .map(|c| format!("• {} ({}) — {}/{}", c.name, c.rarity, c.current_hp, c.max_hp))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Two-section HP panel for both teams
pub fn hp_panel(allies: &[Combatant], enemies: &[Combatant]) -> String {
    let ally_lines = allies
        .iter()
        .map(|c| format!("🛡️ {}: {}", c.name, hp_bar(c.current_hp, c.max_hp, 10)))
        .collect::<Vec<_>>()
        .join("\n");
    let enemy_lines = enemies
        .iter()
        .map(|c| format!("⚔️ {}: {}", c.name, hp_bar(c.current_hp, c.max_hp, 10)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Allies\n{ally_lines}\n\nEnemies\n{enemy_lines}")
}
