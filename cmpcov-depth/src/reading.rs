//! BAM inputs.
//!
//! Headers are checked up front: every file must be coordinate-sorted and share one sequence
//! dictionary. Records are then decoded lazily into [`AlignedRead`]s, with the `RG` tag of each
//! record resolved against the read groups of the file it came from.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use noodles::bam;
use noodles::bgzf;
use noodles::sam;
use noodles::sam::alignment::record::data::field::{Tag, Value};
use noodles::sam::header::record::value::map::header::tag as header_tag;
use noodles::sam::header::record::value::map::read_group::tag as rg_tag;

use crate::dictionary::ReferenceDictionary;
use crate::errors::{CmpCovError, Result};
use crate::record::{AlignedRead, ReadFlags, SpanOp};
use crate::samples::SampleRegistry;

/// Mapping quality when a record does not report one
const MISSING_MAPPING_QUALITY: u8 = 255;

/// An opened BAM file whose header has been read.
pub struct BamInput {
    pub path: PathBuf,
    pub header: sam::Header,
    reader: bam::io::Reader<bgzf::Reader<File>>,
}

impl BamInput {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("Failed to open BAM file {}: {}", path.display(), err),
            )
        })?;
        let mut reader = bam::io::reader::Builder::default().build_from_reader(file);
        let header = reader.read_header().map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("Failed to read BAM header of {}: {}", path.display(), err),
            )
        })?;

        Ok(BamInput {
            path: path.to_owned(),
            header,
            reader,
        })
    }

    /// `@HD SO:coordinate` is required.
    pub fn check_sorted(&self) -> Result<()> {
        let sort_order = self
            .header
            .header()
            .and_then(|hd| hd.other_fields().get(&header_tag::SORT_ORDER));

        match sort_order {
            Some(so) if so.as_slice() == b"coordinate" => Ok(()),
            Some(so) => Err(CmpCovError::InputConsistency(format!(
                "{} is sorted by {}, not coordinate",
                self.path.display(),
                so
            ))),
            None => Err(CmpCovError::InputConsistency(format!(
                "{} does not declare a coordinate sort order",
                self.path.display()
            ))),
        }
    }

    pub fn dictionary(&self) -> ReferenceDictionary {
        ReferenceDictionary::from_header(&self.header)
    }

    /// `SM` of every read group. Read groups without one are skipped.
    pub fn sample_names(&self) -> Vec<String> {
        self.header
            .read_groups()
            .iter()
            .filter_map(|(id, rg)| match rg.other_fields().get(&rg_tag::SAMPLE) {
                Some(sample) => Some(sample.to_string()),
                None => {
                    warn!(
                        "Read group {} of {} has no sample (SM), its reads are ignored",
                        id,
                        self.path.display()
                    );
                    None
                }
            })
            .collect()
    }

    /// Start streaming records, tagging each with its sample column.
    pub fn into_source(self, registry: &SampleRegistry) -> BamSource {
        let read_groups = self
            .header
            .read_groups()
            .iter()
            .filter_map(|(id, rg)| {
                let sample = rg.other_fields().get(&rg_tag::SAMPLE)?;
                let column = registry.column(&sample.to_string())?;
                Some((id.to_vec(), column))
            })
            .collect();

        BamSource {
            reader: self.reader,
            read_groups,
            record: bam::Record::default(),
        }
    }
}

/// Records of one BAM file as [`AlignedRead`]s, in file order.
pub struct BamSource {
    reader: bam::io::Reader<bgzf::Reader<File>>,
    /// read group id to sample column
    read_groups: HashMap<Vec<u8>, usize>,
    record: bam::Record,
}

impl BamSource {
    fn convert(&self) -> Result<AlignedRead> {
        let record = &self.record;
        let flags = record.flags();

        let spans = record
            .cigar()
            .iter()
            .map(|op| {
                op.map(|op| SpanOp {
                    len: op.len() as u32,
                    consumes_reference: op.kind().consumes_reference(),
                    consumes_read: op.kind().consumes_read(),
                })
            })
            .collect::<io::Result<Vec<_>>>()?;

        let sample = match record.data().get(&Tag::READ_GROUP) {
            Some(Ok(Value::String(id))) => {
                let id: &[u8] = id.as_ref();
                self.read_groups.get(id).copied()
            }
            _ => None,
        };

        Ok(AlignedRead {
            reference_id: record.reference_sequence_id().transpose()?,
            start: record
                .alignment_start()
                .transpose()?
                .map(|pos| pos.get() as u32),
            spans,
            flags: ReadFlags {
                unmapped: flags.is_unmapped(),
                secondary: flags.is_secondary(),
                supplementary: flags.is_supplementary(),
                duplicate: flags.is_duplicate(),
                qc_fail: flags.is_qc_fail(),
            },
            mapping_quality: record
                .mapping_quality()
                .map_or(MISSING_MAPPING_QUALITY, |mq| mq.get()),
            sample,
        })
    }
}

impl Iterator for BamSource {
    type Item = Result<AlignedRead>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(0) => None,
            Ok(_) => Some(self.convert()),
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Everything the scan needs to know about its inputs before reading a single record.
pub struct OpenedInputs {
    pub inputs: Vec<BamInput>,
    pub dictionary: ReferenceDictionary,
    pub registry: SampleRegistry,
}

/// Open every BAM, check headers against each other and collect the samples.
pub fn open_inputs(paths: &[PathBuf]) -> Result<OpenedInputs> {
    let mut inputs = Vec::with_capacity(paths.len());
    let mut dictionary: Option<ReferenceDictionary> = None;
    let mut sample_names = Vec::new();

    for path in paths {
        let input = BamInput::open(path)?;
        input.check_sorted()?;

        let dict = input.dictionary();
        match &dictionary {
            None => dictionary = Some(dict),
            Some(first) if *first != dict => {
                return Err(CmpCovError::InputConsistency(format!(
                    "{} does not share the sequence dictionary of {}",
                    path.display(),
                    paths[0].display()
                )));
            }
            Some(_) => {}
        }

        let names = input.sample_names();
        debug!("{}: samples {:?}", path.display(), names);
        sample_names.extend(names);
        inputs.push(input);
    }

    let registry = SampleRegistry::from_names(sample_names);
    if registry.is_empty() {
        return Err(CmpCovError::InputConsistency(
            "no sample (RG/SM) found in the BAM headers".to_string(),
        ));
    }

    Ok(OpenedInputs {
        inputs,
        dictionary: dictionary.unwrap_or_default(),
        registry,
    })
}
