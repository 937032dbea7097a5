use std::hint::black_box;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SampleError;
use crate::libraries::{Library, Operation};
use crate::sampler::{PointerForm, SampledPointer};
use crate::timer::{Sample, SampleKey, timed, timed_once};

/// Per-pointer operations; `set` mutates the document and is not compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Has,
    Get,
}

impl From<Lookup> for Operation {
    fn from(lookup: Lookup) -> Self {
        match lookup {
            Lookup::Has => Operation::Has,
            Lookup::Get => Operation::Get,
        }
    }
}

/// One whole-document flatten per library per cycle, `ops = 1`.
pub fn compare_flatten(doc: &Value, libraries: &[Library], cycles: usize) -> Vec<Sample> {
    debug!(cycles, "comparing flatten");
    let mut report = Vec::new();
    for _ in 0..cycles {
        for library in libraries {
            let Some(flatten) = library.flatten else {
                continue;
            };
            let key = SampleKey::plain(library.name, format!(".{}(data)", flatten.name));
            let sample = timed_once(key, || {
                black_box((flatten.call)(black_box(doc))?);
                Ok(())
            });
            report.push(log_failure(sample));
        }
    }
    report
}

/// Sweeps every sampled pointer through each library's plain and compiled
/// variant of `lookup`; each sweep is one sample with `ops = pointers.len()`.
pub fn compare_lookup(
    doc: &Value,
    pointers: &[SampledPointer],
    form: PointerForm,
    lookup: Lookup,
    libraries: &[Library],
    cycles: usize,
) -> Vec<Sample> {
    debug!(cycles, pointers = pointers.len(), ?lookup, form = form.label(), "comparing lookup");
    if pointers.is_empty() {
        return Vec::new();
    }
    let ops = pointers.len() as u64;
    let mut report = Vec::new();
    for _ in 0..cycles {
        for library in libraries {
            if let Some(sample) = plain_sweep(doc, pointers, form, lookup, library, ops) {
                report.push(log_failure(sample));
            }
            if let Some(sample) = compiled_sweep(doc, pointers, lookup, library, ops) {
                report.push(log_failure(sample));
            }
        }
    }
    report
}

fn plain_sweep(
    doc: &Value,
    pointers: &[SampledPointer],
    form: PointerForm,
    lookup: Lookup,
    library: &Library,
    ops: u64,
) -> Option<Sample> {
    let label = |method: &str| format!(".{}(data, {})", method, form.label());
    match lookup {
        Lookup::Has => {
            let has = library.has?;
            Some(timed(SampleKey::plain(library.name, label(has.name)), ops, || {
                for sampled in pointers {
                    black_box((has.call)(doc, form.select(sampled))?);
                }
                Ok(())
            }))
        }
        Lookup::Get => {
            let get = library.get?;
            Some(timed(SampleKey::plain(library.name, label(get.name)), ops, || {
                for sampled in pointers {
                    black_box((get.call)(doc, form.select(sampled))?);
                }
                Ok(())
            }))
        }
    }
}

fn compiled_sweep(
    doc: &Value,
    pointers: &[SampledPointer],
    lookup: Lookup,
    library: &Library,
    ops: u64,
) -> Option<Sample> {
    let method = Operation::from(lookup).compiled_method(library)?;
    let key = SampleKey::compiled(library.name, format!(".{}(data)", method));
    Some(timed(key, ops, || {
        for sampled in pointers {
            let compiled = sampled
                .compiled_for(library.name)
                .ok_or(SampleError::MissingCompiled(library.name))?;
            match lookup {
                Lookup::Has => black_box(compiled.has(doc)),
                Lookup::Get => black_box(compiled.get(doc).is_some()),
            };
        }
        Ok(())
    }))
}

fn log_failure(sample: Sample) -> Sample {
    if let Some(error) = &sample.error {
        warn!(
            library = sample.library,
            operation = %sample.operation,
            compiled = sample.compiled,
            %error,
            "timed action failed"
        );
    }
    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PointerError;
    use crate::libraries::{Method, registry};
    use crate::pointer::JsonPointer;
    use crate::summary::summarize;
    use serde_json::json;

    fn sample_pointers(pointers: &[&str], libraries: &[Library]) -> Vec<SampledPointer> {
        pointers
            .iter()
            .map(|p| SampledPointer::prepare(p, libraries).unwrap())
            .collect()
    }

    #[test]
    fn test_compare_flatten() {
        let doc = json!({"a": {"b": 1}});
        let libraries = registry();
        let report = compare_flatten(&doc, &libraries, 3);

        // serde_json cannot flatten
        assert_eq!(report.len(), 6);
        assert!(report.iter().all(|s| s.ops == 1 && !s.compiled && !s.failed()));
        let labels: Vec<_> = report[..2].iter().map(|s| (s.library, s.operation.as_str())).collect();
        assert_eq!(labels, vec![("ujson", ".flatten(data)"), ("walk", ".dict(data)")]);
    }

    #[test]
    fn test_compare_lookup_get() {
        let doc = json!({"a": {"b": 1}, "c": [2]});
        let libraries = registry();
        let pointers = sample_pointers(&["/a/b", "/c/0", "/a"], &libraries);
        let report = compare_lookup(&doc, &pointers, PointerForm::FragmentId, Lookup::Get, &libraries, 2);

        // per cycle: ujson plain+compiled, walk plain, serde_json plain+compiled
        assert_eq!(report.len(), 10);
        assert!(report.iter().all(|s| s.ops == 3 && !s.failed()));

        let first_cycle: Vec<_> = report[..5]
            .iter()
            .map(|s| (s.library, s.compiled, s.operation.as_str()))
            .collect();
        assert_eq!(
            first_cycle,
            vec![
                ("ujson", false, ".get(data, fragmentId)"),
                ("ujson", true, ".get(data)"),
                ("walk", false, ".get(data, fragmentId)"),
                ("serde_json", false, ".pointer(data, fragmentId)"),
                ("serde_json", true, ".get(data)"),
            ]
        );
    }

    #[test]
    fn test_compare_lookup_has_skips_incapable() {
        let doc = json!({"a": 1});
        let libraries = registry();
        let pointers = sample_pointers(&["/a"], &libraries);
        let report = compare_lookup(&doc, &pointers, PointerForm::Pointer, Lookup::Has, &libraries, 1);

        let rows: Vec<_> = report.iter().map(|s| (s.library, s.compiled)).collect();
        assert_eq!(rows, vec![("ujson", false), ("ujson", true), ("walk", false)]);
    }

    // a failing library is recorded, the others still run
    #[test]
    fn test_failure_is_isolated() {
        fn broken(_: &serde_json::Value, _: &str) -> Result<bool, PointerError> {
            Err(PointerError::NoParse(0))
        }
        let libraries = vec![
            Library {
                has: Some(Method::new("has", broken)),
                ..Library::named("broken")
            },
            registry()[0],
        ];
        let doc = json!({"a": 1});
        let pointers = sample_pointers(&["/a"], &libraries);
        let report = compare_lookup(&doc, &pointers, PointerForm::Pointer, Lookup::Has, &libraries, 2);

        assert_eq!(report.len(), 6);
        let failed: Vec<_> = report.iter().filter(|s| s.failed()).map(|s| s.library).collect();
        assert_eq!(failed, vec!["broken", "broken"]);
        assert!(report.iter().filter(|s| s.library == "ujson").all(|s| s.ea.is_some()));
    }

    #[test]
    fn test_missing_compiled_pointer_fails_the_sweep() {
        let libraries = registry();
        let doc = json!({"a": 1});
        // prepared without any compiling library
        let pointers = sample_pointers(&["/a"], &[]);
        let report = compare_lookup(&doc, &pointers, PointerForm::Pointer, Lookup::Get, &libraries, 1);
        let compiled: Vec<_> = report.iter().filter(|s| s.compiled).collect();
        assert_eq!(compiled.len(), 2);
        assert_eq!(compiled[0].error, Some(SampleError::MissingCompiled("ujson")));
    }

    // each plain sweep receives the string form its comparison names
    #[test]
    fn test_plain_sweep_passes_selected_form() {
        fn get_fragment<'a>(doc: &'a Value, pointer: &str) -> Result<Option<&'a Value>, PointerError> {
            if !pointer.starts_with('#') {
                return Err(PointerError::NoParse(0));
            }
            Ok(JsonPointer::parse(pointer)?.resolve(doc))
        }
        fn has_pointer(doc: &Value, pointer: &str) -> Result<bool, PointerError> {
            if !pointer.starts_with('/') {
                return Err(PointerError::NoParse(0));
            }
            Ok(JsonPointer::parse(pointer)?.resolve(doc).is_some())
        }
        let libraries = [Library {
            get: Some(Method::new("get", get_fragment)),
            has: Some(Method::new("has", has_pointer)),
            ..Library::named("strict")
        }];
        let doc = json!({"a": 1, "b": [2]});
        let pointers = sample_pointers(&["/a", "/b/0"], &libraries);

        let run = |form, lookup| compare_lookup(&doc, &pointers, form, lookup, &libraries, 2);
        let get_fragment_id = run(PointerForm::FragmentId, Lookup::Get);
        assert_eq!(get_fragment_id.len(), 2);
        assert!(get_fragment_id.iter().all(|s| !s.failed()));
        assert!(run(PointerForm::Pointer, Lookup::Get).iter().all(Sample::failed));

        let has_pointer = run(PointerForm::Pointer, Lookup::Has);
        assert_eq!(has_pointer.len(), 2);
        assert!(has_pointer.iter().all(|s| !s.failed()));
        assert!(run(PointerForm::FragmentId, Lookup::Has).iter().all(Sample::failed));
    }

    // with nothing sampled there is nothing to time or rank
    #[test]
    fn test_compare_lookup_without_pointers() {
        let libraries = registry();
        let doc = json!({"a": 1});
        let report = compare_lookup(&doc, &[], PointerForm::Pointer, Lookup::Get, &libraries, 3);
        assert!(report.is_empty());

        let rows = summarize(&report, Operation::Get, &libraries);
        assert!(rows.iter().all(|row| row.avg.is_none() && row.failed == 0));
    }
}
