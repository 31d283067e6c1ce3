// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fuzz target for path normalization and comparison

#![no_main]

use arbitrary::Arbitrary;
use fsport_core::path::{self, PathStyle};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    windows: bool,
    case_sensitive: bool,
    parent: &'a str,
    child: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let style = if input.windows { PathStyle::Windows } else { PathStyle::Unix };

    // Normalization is idempotent
    let once = style.normalize(input.parent);
    assert_eq!(style.normalize(&once), once);
    assert!(style.are_equal(input.parent, &once, input.case_sensitive));

    // A path never contains itself
    assert!(!style.contains_sub_path(input.parent, input.parent, input.case_sensitive));

    let joined = style.make_absolute(input.parent, input.child);
    let _ = style.is_root(&joined);
    let _ = style.file_name(&joined);

    let name = path::valid_filename(input.child);
    assert!(!name.contains(|c: char| c == '/' || c == '\\' || (c as u32) < 0x20));
    let _ = path::extension(&name);
    let _ = path::file_stem(&name);
    let _ = path::is_path_file(input.child);
});
