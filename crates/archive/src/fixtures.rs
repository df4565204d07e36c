//! Archive builders for tests.

use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Build a ZIP archive in memory, with entries written in the given order.
///
/// Panics if the archive cannot be written. If test setup is wrong, then test
/// should not pass.
pub fn build_archive<I, N, D>(entries: I) -> Vec<u8>
where
    I: IntoIterator<Item = (N, D)>,
    N: AsRef<str>,
    D: AsRef<[u8]>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer.start_file(name.as_ref(), SimpleFileOptions::default()).expect("start archive entry");
        writer.write_all(data.as_ref()).expect("write archive entry");
    }
    writer.finish().expect("finish archive").into_inner()
}
