use std::error;

use camino::Utf8Path;
use log::info;
use thousands::Separable;

use crate::breakpoint_graph::build_breakpoint_graph;
use crate::cli;
use crate::run_stats::{InputStats, OutputStats, SimplifyRunStats, write_simplify_run_stats};
use crate::segment_store::SegmentStore;
use crate::segment_table::{read_segment_table, write_segment_table};
use crate::simplification_output::write_simplification_table;
use crate::simplify::{
    AcceptAllStrategy, DefaultSimplificationStrategy, SimplificationStrategy,
    SimplifyEngineSettings, get_unconsumed_svs, simplify_breakpoint_graph,
};
use crate::sv_table::{read_sv_table, write_sv_table};

pub const REDUCED_SV_FILENAME: &str = "reduced.sv.tsv";
pub const RUN_STATS_FILENAME: &str = "run.stats.json";
pub const SETTINGS_FILENAME: &str = "simplify.settings.json";
pub const SIMPLIFICATIONS_FILENAME: &str = "simplifications.tsv";
pub const SIMPLIFIED_SEGMENTS_FILENAME: &str = "simplified.cn.tsv";

fn get_strategy(settings: &cli::SimplifySettings) -> Box<dyn SimplificationStrategy> {
    if settings.accept_all {
        Box::new(AcceptAllStrategy)
    } else {
        Box::new(DefaultSimplificationStrategy {
            max_copy_number_delta: settings.max_copy_number_delta,
            max_event_delta: settings.max_event_delta,
        })
    }
}

/// Run the simplify command on one sample
///
/// Any input data error stops the run before graph simplification begins.
///
pub fn run_simplify(
    shared_settings: &cli::SharedSettings,
    settings: &cli::SimplifySettings,
) -> Result<(), Box<dyn error::Error>> {
    cli::write_simplify_settings(&settings.output_dir, settings);

    let segment_records = read_segment_table(Utf8Path::new(&settings.segments_filename))?;
    let store = SegmentStore::load(segment_records)?;
    let svs = read_sv_table(Utf8Path::new(&settings.svs_filename))?;

    let input_stats = InputStats {
        chromosome_count: store.chrom_list().len(),
        segment_count: store.segment_count(),
        sv_count: svs.len(),
        single_breakend_count: svs.iter().filter(|x| x.is_single_breakend()).count(),
    };
    info!(
        "Loaded {} copy number segments on {} chromosomes, and {} structural variants",
        input_stats.segment_count.separate_with_commas(),
        input_stats.chromosome_count,
        input_stats.sv_count.separate_with_commas()
    );

    let mut graph = build_breakpoint_graph(&store, &svs)?;

    info!("Simplifying breakpoint graph");
    let start = std::time::Instant::now();
    let strategy = get_strategy(settings);
    let engine_settings = SimplifyEngineSettings {
        max_iterations: settings.max_iterations,
        debug: shared_settings.debug,
    };
    let result = simplify_breakpoint_graph(&mut graph, strategy.as_ref(), &engine_settings)?;
    let total_simplification_time_secs = start.elapsed().as_secs_f64();

    let unconsumed_svs = get_unconsumed_svs(&svs, &result.simplifications);

    let (reference_edge_count, sv_edge_count) = graph.edge_counts();
    let output_stats = OutputStats {
        segment_count: graph.segment_count(),
        reference_edge_count,
        sv_edge_count,
        unconsumed_sv_count: unconsumed_svs.len(),
    };
    info!(
        "Accepted {} simplifications, consuming {} of {} structural variants. {} segments remain.",
        result.simplifications.len().separate_with_commas(),
        (svs.len() - unconsumed_svs.len()).separate_with_commas(),
        svs.len().separate_with_commas(),
        output_stats.segment_count.separate_with_commas()
    );

    let output_dir = &settings.output_dir;
    write_simplification_table(
        &output_dir.join(SIMPLIFICATIONS_FILENAME),
        &svs,
        &result.simplifications,
    );
    write_sv_table(&output_dir.join(REDUCED_SV_FILENAME), &unconsumed_svs);
    write_segment_table(
        &output_dir.join(SIMPLIFIED_SEGMENTS_FILENAME),
        graph.chrom_list(),
        graph.sorted_segments(),
    );

    let run_stats = SimplifyRunStats {
        input_stats,
        simplify_stats: result.stats,
        output_stats,
        total_simplification_time_secs,
    };
    write_simplify_run_stats(&output_dir.join(RUN_STATS_FILENAME), &run_stats);

    Ok(())
}
