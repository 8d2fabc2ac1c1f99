use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use num_integer::Integer;
use num_traits::ToPrimitive;
use tracing::info;

use crate::chart::{KeyLayout, NotefieldObject};
use crate::convert::ConvertedChart;
use crate::error::{Error, Result};
use crate::timing::SealedTimingTable;
use crate::units::{format_thousandths, POSITION_RESOLUTION};

/// Rows in a measure without objects, and the minimum for any measure.
const MIN_ROWS: usize = 4;

/// Render `chart` as a StepMania `.sm` file referring to `music_file`.
pub fn compose_sm(chart: &ConvertedChart, layout: &KeyLayout, music_file: &str) -> Result<String> {
    if chart.objects.is_empty() {
        return Err(Error::EmptyChart);
    }
    let meta = &chart.metadata;

    let mut output = String::new();
    let _ = writeln!(output, "#TITLE:{};", meta.title);
    let _ = writeln!(output, "#SUBTITLE:{};", meta.subtitle);
    let _ = writeln!(output, "#ARTIST:{};", meta.artist);
    let _ = writeln!(output, "#CREDIT:{};", meta.credit);
    let _ = writeln!(output, "#MUSIC:{};", music_file);
    let _ = writeln!(output, "#SELECTABLE:YES;");
    let _ = writeln!(output, "#BANNER:{};", meta.banner);
    let _ = writeln!(output, "#BACKGROUND:{};", meta.background);
    let _ = writeln!(output, "#GENRE:{};", meta.genre);
    let _ = writeln!(output, "#CDTITLE:;");
    let _ = writeln!(output, "#OFFSET:0.0000000;");
    let _ = writeln!(output, "#BPMS:{};", tempo_list(&chart.timing));
    let _ = writeln!(output, "#STOPS:{};", pause_list(&chart.timing));
    let _ = writeln!(output, "#NOTES:");
    let _ = writeln!(output, "{}:", layout.game_mode().as_str());
    let _ = writeln!(output, ":");
    let _ = writeln!(output, "{}:", meta.difficulty.sm_name());
    let _ = writeln!(output, "{}:", meta.difficulty.level());
    let _ = writeln!(output, "0.000,0.000,0.000,0.000,0.000:");
    let _ = writeln!(output, "{}", note_rows(&chart.objects, layout));
    let _ = write!(output, ";");
    Ok(output)
}

/// Write the `.sm` rendering of `chart` to `path`.
pub fn export_sm<P: AsRef<Path>>(
    path: P,
    chart: &ConvertedChart,
    layout: &KeyLayout,
    music_file: &str,
) -> Result<()> {
    let content = compose_sm(chart, layout, music_file)?;
    fs::write(path.as_ref(), content)?;
    info!("Wrote chart to {}", path.as_ref().display());
    Ok(())
}

/// `beat=bpm` pairs.
fn tempo_list(timing: &SealedTimingTable) -> String {
    timing
        .tempo_changes()
        .map(|(position, bpm)| format!("{}={}", position.to_beat(), bpm))
        .collect::<Vec<_>>()
        .join(",")
}

/// `beat=seconds` pairs.
fn pause_list(timing: &SealedTimingTable) -> String {
    timing
        .pauses()
        .map(|(position, pause)| {
            format!(
                "{}={}",
                position.to_beat(),
                format_thousandths(&pause.seconds())
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Row count of a measure: a multiple of 4 fine enough for every object in it.
fn rows_per_measure(objects: &[NotefieldObject]) -> BTreeMap<u32, usize> {
    let mut rows = BTreeMap::new();
    for object in objects {
        let denom = denominator(object);
        let entry = rows
            .entry(object.position.measure_index())
            .or_insert(MIN_ROWS);
        *entry = entry.lcm(&denom);
    }
    rows
}

fn denominator(object: &NotefieldObject) -> usize {
    object
        .position
        .value()
        .denom()
        .to_usize()
        .unwrap_or(POSITION_RESOLUTION as usize)
}

/// Note rows, measures separated by `,` lines.
fn note_rows(objects: &[NotefieldObject], layout: &KeyLayout) -> String {
    let rows = rows_per_measure(objects);
    let measure_count = rows.keys().next_back().map_or(0, |last| *last as usize + 1);
    let columns = layout.column_count();

    let mut measures: Vec<Vec<Vec<char>>> = (0..measure_count)
        .map(|m| {
            let count = rows.get(&(m as u32)).copied().unwrap_or(MIN_ROWS);
            vec![vec!['0'; columns]; count]
        })
        .collect();

    for object in objects {
        let Some(column) = layout.column_of(object.key) else {
            continue;
        };
        let measure = object.position.measure_index();
        let count = rows.get(&measure).copied().unwrap_or(MIN_ROWS);
        let local = object.position.local_offset();
        let numer = local.numer().to_usize().unwrap_or(0);
        let row = numer * (count / denominator(object));
        measures[measure as usize][row][column] = object.symbol.as_char();
    }

    measures
        .iter()
        .map(|rows| {
            rows.iter()
                .map(|row| row.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n,\n")
}
