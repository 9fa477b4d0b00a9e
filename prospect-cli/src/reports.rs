use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use prospect_core::{
    EquipmentLoadout, LoadoutComparison, MuseumSlot, OptimizationResult, StatBreakdown, StatKey,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeReport<'a> {
    pub result: &'a OptimizationResult,
    pub comparison: &'a LoadoutComparison,
}

pub fn generate_json_report<W, T>(out: &mut W, payload: &T) -> Result<()>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    let json_output = serde_json::to_string_pretty(payload)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

fn slot_label(name: Option<&str>) -> &str {
    name.unwrap_or("-")
}

fn loadout_lines(loadout: &EquipmentLoadout) -> Vec<(String, String)> {
    let mut lines = Vec::new();
    for (index, ring) in loadout.rings.iter().enumerate() {
        if let Some(ring) = ring {
            let tier = if ring.enhanced { " (enhanced)" } else { "" };
            lines.push((format!("Ring {}", index + 1), format!("{}{tier}", ring.item.name)));
        }
    }
    let jewelry = [("Necklace", &loadout.necklace), ("Charm", &loadout.charm)];
    for (label, slot) in jewelry {
        let name = slot.as_ref().map(|equipped| equipped.item.name.as_str());
        lines.push((label.to_string(), slot_label(name).to_string()));
    }
    lines.push(("Shovel".to_string(), slot_label(loadout.shovel.as_deref()).to_string()));
    lines.push(("Pan".to_string(), slot_label(loadout.pan.as_deref()).to_string()));
    lines.push(("Enchant".to_string(), slot_label(loadout.enchant.as_deref()).to_string()));
    if !loadout.potions.is_empty() {
        lines.push(("Potions".to_string(), loadout.potions.join(", ")));
    }
    if !loadout.events.is_empty() {
        lines.push(("Events".to_string(), loadout.events.join(", ")));
    }
    lines
}

fn museum_lines(museum: &[MuseumSlot]) -> Vec<(String, String)> {
    museum
        .iter()
        .filter(|slot| slot.is_occupied())
        .map(|slot| {
            let ore = slot_label(slot.ore.as_deref());
            let value = slot
                .modifier
                .as_deref()
                .map_or_else(|| ore.to_string(), |modifier| format!("{ore} + {modifier}"));
            (slot.id.to_string(), value)
        })
        .collect()
}

pub fn generate_stats_console_report<W>(out: &mut W, breakdown: &StatBreakdown) -> Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out)?;
    writeln!(out, "{}", "📊 Stat Breakdown".bright_cyan().bold())?;
    writeln!(out, "{}", "=================".cyan())?;
    writeln!(
        out,
        "{:<16} {:>12} {:>10} {:>12} {:>12}",
        "Stat", "Base", "Museum", "With museum", "With events"
    )?;
    for key in StatKey::ALL {
        writeln!(
            out,
            "{:<16} {:>12.2} {:>9.2}% {:>12.2} {:>12.2}",
            key.label(),
            breakdown.base.get(key),
            breakdown.museum_bonuses.get(key) * 100.0,
            breakdown.with_museum.get(key),
            breakdown.with_events.get(key)
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Luck efficiency: {}",
        format!("{:.4}", breakdown.efficiency).green().bold()
    )?;
    Ok(())
}

pub fn generate_stats_markdown_report<W>(out: &mut W, breakdown: &StatBreakdown) -> Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out, "# Prospect Planner Stat Breakdown\n")?;
    writeln!(out, "| Stat | Base | Museum | With museum | With events |")?;
    writeln!(out, "|------|-----:|-------:|------------:|------------:|")?;
    for key in StatKey::ALL {
        writeln!(
            out,
            "| {} | {:.2} | {:.2}% | {:.2} | {:.2} |",
            key.label(),
            breakdown.base.get(key),
            breakdown.museum_bonuses.get(key) * 100.0,
            breakdown.with_museum.get(key),
            breakdown.with_events.get(key)
        )?;
    }
    writeln!(out, "\n**Luck efficiency**: {:.4}", breakdown.efficiency)?;
    Ok(())
}

pub fn generate_optimize_console_report<W>(
    out: &mut W,
    result: &OptimizationResult,
    comparison: &LoadoutComparison,
) -> Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out)?;
    writeln!(out, "{}", "🏆 Optimized Plan".bright_cyan().bold())?;
    writeln!(out, "{}", "=================".cyan())?;
    if result.cancelled {
        writeln!(
            out,
            "{}",
            "⚠️  Search cancelled; showing the best plan found so far".yellow()
        )?;
    }
    writeln!(
        out,
        "Candidates evaluated: {}/{}",
        result.evaluated, result.total_candidates
    )?;
    writeln!(out)?;
    for (label, value) in loadout_lines(&result.loadout) {
        writeln!(out, "  {label:<10} {}", value.bold())?;
    }

    let museum = museum_lines(&result.museum);
    if !museum.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "🏛️  Museum".bright_yellow().bold())?;
        for (slot, value) in museum {
            writeln!(out, "  {slot:<12} {value}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", "⚡ Changes".bright_yellow().bold())?;
    let mut any_change = false;
    for delta in comparison.changed() {
        any_change = true;
        let change = delta.change();
        let formatted = format!("{change:+.2}");
        let colored_change = if change > 0.0 {
            formatted.green()
        } else {
            formatted.red()
        };
        writeln!(
            out,
            "  {:<16} {:>10.2} → {:>10.2} ({colored_change})",
            delta.stat.label(),
            delta.current,
            delta.proposed
        )?;
    }
    if !any_change {
        writeln!(out, "  No stat changes.")?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Luck efficiency: {:.4} → {} ({:+.4})",
        comparison.current.efficiency,
        format!("{:.4}", result.efficiency).green().bold(),
        comparison.efficiency_delta
    )?;
    Ok(())
}

pub fn generate_optimize_markdown_report<W>(
    out: &mut W,
    result: &OptimizationResult,
    comparison: &LoadoutComparison,
) -> Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out, "# Prospect Planner Optimization\n")?;
    writeln!(out, "## Summary\n")?;
    writeln!(
        out,
        "- **Candidates evaluated**: {}/{}",
        result.evaluated, result.total_candidates
    )?;
    writeln!(out, "- **Cancelled**: {}", result.cancelled)?;
    writeln!(
        out,
        "- **Luck efficiency**: {:.4} → {:.4} ({:+.4})\n",
        comparison.current.efficiency, result.efficiency, comparison.efficiency_delta
    )?;

    writeln!(out, "## Loadout\n")?;
    for (label, value) in loadout_lines(&result.loadout) {
        writeln!(out, "- **{label}**: {value}")?;
    }

    let museum = museum_lines(&result.museum);
    if !museum.is_empty() {
        writeln!(out, "\n## Museum\n")?;
        for (slot, value) in museum {
            writeln!(out, "- `{slot}`: {value}")?;
        }
    }

    writeln!(out, "\n## Stat Changes\n")?;
    writeln!(out, "| Stat | Current | Optimized | Change |")?;
    writeln!(out, "|------|--------:|----------:|-------:|")?;
    for delta in &comparison.deltas {
        writeln!(
            out,
            "| {} | {:.2} | {:.2} | {:+.2} |",
            delta.stat.label(),
            delta.current,
            delta.proposed,
            delta.change()
        )?;
    }
    Ok(())
}
