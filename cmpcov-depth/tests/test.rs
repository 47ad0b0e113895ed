use std::fs::{self, File};
use std::path::{Path, PathBuf};

use noodles::bam;
use noodles::sam;
use noodles::sam::alignment::io::Write as _;
use rstest::*;
use tempfile::TempDir;

use cmpcov_depth::CmpCovConfig;

const HEADER_CHR1_CHR2: &str = "@HD\tVN:1.6\tSO:coordinate\n@SQ\tSN:chr1\tLN:1000\n@SQ\tSN:chr2\tLN:1000\n";

/// One SAM line with an all-match CIGAR of `len` bases in read group `rg1`.
fn sam_read(name: &str, flag: u16, chrom: &str, pos: u32, mapq: u8, len: usize) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}M\t*\t0\t0\t{}\t*\tRG:Z:rg1\n",
        name,
        flag,
        chrom,
        pos,
        mapq,
        len,
        "A".repeat(len)
    )
}

/// Convert SAM text to a BAM file at `path`.
fn write_bam(path: &Path, sam_text: &str) {
    let mut reader = sam::io::Reader::new(sam_text.as_bytes());
    let header = reader.read_header().unwrap();

    let mut writer = bam::io::Writer::new(File::create(path).unwrap());
    writer.write_header(&header).unwrap();
    for result in reader.records() {
        let record = result.unwrap();
        writer.write_alignment_record(&header, &record).unwrap();
    }
    writer.try_finish().unwrap();
}

/// A coordinate-sorted BAM holding a single sample.
fn sample_bam(dir: &Path, sample: &str, reads: &[String]) -> PathBuf {
    let path = dir.join(format!("{}.bam", sample));
    let mut text = format!("{}@RG\tID:rg1\tSM:{}\n", HEADER_CHR1_CHR2, sample);
    for read in reads {
        text.push_str(read);
    }
    write_bam(&path, &text);
    path
}

#[fixture]
fn workdir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// s1: 100..=109 and 105..=114, s2: 100..=119
#[fixture]
fn two_samples(workdir: TempDir) -> (TempDir, PathBuf, PathBuf) {
    let s1 = sample_bam(
        workdir.path(),
        "s1",
        &[
            sam_read("r1", 0, "chr1", 100, 60, 10),
            sam_read("r2", 0, "chr1", 105, 60, 10),
        ],
    );
    let s2 = sample_bam(workdir.path(), "s2", &[sam_read("r3", 0, "chr1", 100, 60, 20)]);
    (workdir, s1, s2)
}

fn config(inputs: Vec<PathBuf>, output: PathBuf) -> CmpCovConfig {
    CmpCovConfig {
        inputs,
        output: Some(output),
        max_depth: 4,
        image_size: 200,
        progress: false,
        ..Default::default()
    }
}

mod tests {
    use super::*;

    use cmpcov_depth::CmpCovError;
    use cmpcov_depth::dictionary::{ReferenceDictionary, ReferenceSequence};
    use cmpcov_depth::filter::ReadFilter;
    use cmpcov_depth::ledger::{DepthEntry, DepthLedger};
    use cmpcov_depth::matrix::{BitSampleMatrix, compute_bit_size};
    use cmpcov_depth::merge::{MergeSource, SortedMerger};
    use cmpcov_depth::reading::open_inputs;
    use cmpcov_depth::record::{AlignedRead, SpanOp};
    use cmpcov_depth::scan::Scanner;
    use cmpcov_depth::{compare_coverage, plot};
    use indicatif::ProgressBar;
    use pretty_assertions::assert_eq;

    #[rstest]
    fn test_plot_writes_png(two_samples: (TempDir, PathBuf, PathBuf)) {
        let (dir, s1, s2) = two_samples;
        let output = dir.path().join("out").join("depth.png");

        let comparison = plot(&config(vec![s2, s1], output.clone())).unwrap();

        assert_eq!(comparison.samples, vec!["s1", "s2"]);
        assert_eq!(comparison.bit_size, 4);
        assert_eq!(comparison.stats.records, 3);
        assert_eq!(comparison.stats.positions_flushed, 20);
        assert_eq!(comparison.image.dimensions(), (200, 200));

        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (200, 200));
    }

    #[rstest]
    fn test_bam_depths_reach_the_matrix(two_samples: (TempDir, PathBuf, PathBuf)) {
        let (_dir, s1, s2) = two_samples;
        let opened = open_inputs(&[s1, s2]).unwrap();
        let registry = opened.registry;
        let dictionary = opened.dictionary;

        let sources = opened
            .inputs
            .into_iter()
            .map(|input| {
                let name = input.path.display().to_string();
                MergeSource::new(name, input.into_source(&registry))
            })
            .collect();
        let merger = SortedMerger::new(sources).unwrap();

        let mut matrix = BitSampleMatrix::new(2, 4, 0, 4);
        Scanner::new(ReadFilter::default(), None, &dictionary, ProgressBar::hidden())
            .run(merger, 2, &mut matrix)
            .unwrap();

        // (s1, s2) depth pairs: (1,1) at 100..=104 and 110..=114, (2,1) at 105..=109,
        // (0,1) at 115..=119
        let mut cell: Vec<(usize, usize)> = matrix.iter_cell(0, 1).collect();
        cell.sort();
        assert_eq!(cell, vec![(0, 1), (1, 1), (2, 1)]);

        let mut mirror: Vec<(usize, usize)> = matrix.iter_cell(1, 0).collect();
        mirror.sort();
        assert_eq!(mirror, vec![(1, 0), (1, 1), (1, 2)]);
    }

    #[rstest]
    fn test_filtered_and_unassigned_reads(workdir: TempDir) {
        let mut no_rg = sam_read("r4", 0, "chr1", 300, 60, 5);
        no_rg = no_rg.replace("\tRG:Z:rg1", "");
        let bam = sample_bam(
            workdir.path(),
            "s1",
            &[
                sam_read("r1", 0, "chr1", 100, 60, 5),
                sam_read("dup", 1024, "chr1", 110, 60, 5),
                sam_read("mapq0", 0, "chr1", 120, 0, 5),
                sam_read("secondary", 256, "chr1", 130, 60, 5),
                no_rg,
            ],
        );

        let comparison =
            compare_coverage(&config(vec![bam], workdir.path().join("x.png"))).unwrap();

        assert_eq!(comparison.stats.records, 5);
        assert_eq!(comparison.stats.filtered, 3);
        assert_eq!(comparison.stats.without_sample, 1);
        assert_eq!(comparison.stats.positions_flushed, 5);
    }

    #[rstest]
    fn test_bed_restricts_positions(two_samples: (TempDir, PathBuf, PathBuf)) {
        let (dir, s1, s2) = two_samples;
        let bed = dir.path().join("targets.bed");
        fs::write(&bed, "chr1\t104\t110\n").unwrap();

        let mut config = config(vec![s1, s2], dir.path().join("x.png"));
        config.bed = Some(bed);
        let comparison = compare_coverage(&config).unwrap();

        // 1-based 105..=110
        assert_eq!(comparison.stats.positions_flushed, 6);
        assert_eq!(comparison.stats.increments_skipped, 0);
    }

    #[rstest]
    fn test_region_keeps_whole_reads(two_samples: (TempDir, PathBuf, PathBuf)) {
        let (dir, s1, s2) = two_samples;
        let mut config = config(vec![s1, s2], dir.path().join("x.png"));
        config.region = Some("chr1:112-113".to_string());

        let comparison = compare_coverage(&config).unwrap();

        // r1 (100..=109) misses the region, r2 and r3 are counted in full
        assert_eq!(comparison.stats.outside_restriction, 1);
        assert_eq!(comparison.stats.positions_flushed, 20);
    }

    #[rstest]
    fn test_list_input(two_samples: (TempDir, PathBuf, PathBuf)) {
        let (dir, s1, s2) = two_samples;
        let list = dir.path().join("bams.list");
        fs::write(
            &list,
            format!("{}\n{}\n{}\n", s1.display(), s2.display(), s1.display()),
        )
        .unwrap();

        let comparison = compare_coverage(&config(vec![list], dir.path().join("x.jpg"))).unwrap();
        assert_eq!(comparison.samples, vec!["s1", "s2"]);
    }

    #[rstest]
    fn test_bed_and_region_fail_before_inputs_are_opened(workdir: TempDir) {
        let mut config = config(
            vec![workdir.path().join("missing.bam")],
            workdir.path().join("x.png"),
        );
        config.bed = Some(workdir.path().join("missing.bed"));
        config.region = Some("chr1".to_string());

        let result = compare_coverage(&config);
        assert!(matches!(result, Err(CmpCovError::Configuration(_))));
    }

    #[rstest]
    fn test_unsorted_header_is_rejected(workdir: TempDir) {
        let path = workdir.path().join("unsorted.bam");
        let text = format!(
            "@HD\tVN:1.6\tSO:unsorted\n@SQ\tSN:chr1\tLN:1000\n@RG\tID:rg1\tSM:s1\n{}",
            sam_read("r1", 0, "chr1", 1, 60, 5)
        );
        write_bam(&path, &text);

        let result = compare_coverage(&config(vec![path], workdir.path().join("x.png")));
        assert!(matches!(result, Err(CmpCovError::InputConsistency(_))));
    }

    #[rstest]
    fn test_out_of_order_records_are_rejected(workdir: TempDir) {
        let bam = sample_bam(
            workdir.path(),
            "s1",
            &[
                sam_read("r1", 0, "chr2", 10, 60, 5),
                sam_read("r2", 0, "chr1", 10, 60, 5),
            ],
        );

        let result = compare_coverage(&config(vec![bam], workdir.path().join("x.png")));
        match result {
            Err(CmpCovError::InputConsistency(msg)) => assert!(msg.contains("not coordinate-sorted")),
            Err(other) => panic!("unexpected error {}", other),
            Ok(_) => panic!("out of order records were accepted"),
        }
    }

    #[rstest]
    fn test_dictionaries_must_match(workdir: TempDir) {
        let s1 = sample_bam(workdir.path(), "s1", &[sam_read("r1", 0, "chr1", 1, 60, 5)]);
        let other = workdir.path().join("other.bam");
        let text = format!(
            "@HD\tVN:1.6\tSO:coordinate\n@SQ\tSN:chr1\tLN:2000\n@RG\tID:rg1\tSM:s2\n{}",
            sam_read("r2", 0, "chr1", 1, 60, 5)
        );
        write_bam(&other, &text);

        let result = compare_coverage(&config(vec![s1, other], workdir.path().join("x.png")));
        assert!(matches!(result, Err(CmpCovError::InputConsistency(_))));
    }

    #[rstest]
    fn test_headers_without_samples(workdir: TempDir) {
        let path = workdir.path().join("nosm.bam");
        let text = format!(
            "{}@RG\tID:rg1\n{}",
            HEADER_CHR1_CHR2,
            sam_read("r1", 0, "chr1", 1, 60, 5)
        );
        write_bam(&path, &text);

        let result = compare_coverage(&config(vec![path], workdir.path().join("x.png")));
        assert!(matches!(result, Err(CmpCovError::InputConsistency(_))));
    }

    #[rstest]
    fn test_region_on_unknown_chromosome(two_samples: (TempDir, PathBuf, PathBuf)) {
        let (dir, s1, s2) = two_samples;
        let mut config = config(vec![s1, s2], dir.path().join("x.png"));
        config.region = Some("chrZ:1-10".to_string());

        let result = compare_coverage(&config);
        assert!(matches!(result, Err(CmpCovError::InputConsistency(_))));
    }

    #[rstest]
    fn test_ledger_flushes_only_unreachable_positions() {
        let reads = [
            AlignedRead::new(0, 100, vec![SpanOp::aligned(6)], Some(0)),
            AlignedRead::new(0, 102, vec![SpanOp::aligned(7)], Some(1)),
            AlignedRead::new(0, 110, vec![SpanOp::aligned(3)], Some(2)),
        ];
        let mut ledger = DepthLedger::new(3);
        let mut sink: Vec<DepthEntry> = Vec::new();

        ledger.advance(0, 100, &mut sink);
        ledger.accumulate(&reads[0], 0, None).unwrap();
        assert!(sink.is_empty());

        ledger.advance(0, 102, &mut sink);
        assert_eq!(sink.iter().map(|e| e.position).collect::<Vec<_>>(), vec![100, 101]);
        ledger.accumulate(&reads[1], 1, None).unwrap();

        ledger.advance(0, 110, &mut sink);
        // 102..=108 are complete once a read starts at 110
        assert_eq!(sink.last().map(|e| e.position), Some(108));
        ledger.accumulate(&reads[2], 2, None).unwrap();
        ledger.drain(&mut sink);

        let depths: Vec<(u32, Vec<u32>)> = sink.into_iter().map(|e| (e.position, e.depths)).collect();
        let mut expected = Vec::new();
        for pos in 100..=101 {
            expected.push((pos, vec![1, 0, 0]));
        }
        for pos in 102..=105 {
            expected.push((pos, vec![1, 1, 0]));
        }
        for pos in 106..=108 {
            expected.push((pos, vec![0, 1, 0]));
        }
        for pos in 110..=112 {
            expected.push((pos, vec![0, 0, 1]));
        }
        assert_eq!(depths, expected);
    }

    #[rstest]
    fn test_merge_order() {
        let read = |reference_id: usize, start: u32| {
            Ok::<_, CmpCovError>(AlignedRead::new(reference_id, start, vec![SpanOp::aligned(1)], Some(0)))
        };
        let merger = SortedMerger::new(vec![
            MergeSource::new("a", vec![read(0, 5), read(1, 1)].into_iter()),
            MergeSource::new("b", vec![read(0, 3)].into_iter()),
        ])
        .unwrap();

        let order: Vec<(Option<usize>, Option<u32>)> = merger
            .map(|r| r.map(|read| (read.reference_id, read.start)))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            order,
            vec![(Some(0), Some(3)), (Some(0), Some(5)), (Some(1), Some(1))]
        );
    }

    #[rstest]
    fn test_bit_size_and_shared_position() {
        assert_eq!(compute_bit_size(0, 10, 7.0), 7);

        let bit_size = compute_bit_size(0, 4, 7.0);
        let mut matrix = BitSampleMatrix::new(2, bit_size, 0, 4);
        matrix.paint(&[3, 3]);

        let q = 3 * bit_size / 4;
        assert_eq!(matrix.iter_cell(0, 1).collect::<Vec<_>>(), vec![(q, q)]);
        assert_eq!(matrix.iter_cell(1, 0).collect::<Vec<_>>(), vec![(q, q)]);
    }

    #[rstest]
    fn test_dictionary_names() {
        let dict = ReferenceDictionary::from(vec![ReferenceSequence {
            name: "chrM".to_string(),
            length: 16_569,
        }]);
        assert_eq!(dict.name(Some(0)), "chrM");
        assert_eq!(dict.name(Some(3)), "*");
    }
}
