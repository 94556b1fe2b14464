use std::io::Write;
use std::path::Path;

use lincs_core::Feature;

use crate::error::Result;
use crate::utils::get_dynamic_writer;

///
/// Write one `name \t aliases \t provenance` line per feature, aliases joined
/// by commas. This is the audit trail of which original features and source
/// datasets ended up in each merged feature.
///
pub fn write_name_table(path: &Path, features: &[Feature]) -> Result<()> {
    let mut writer = get_dynamic_writer(path)?;
    for f in features {
        writeln!(writer, "{}\t{}\t{}", f.name, f.aliases.join(","), f.provenance)?;
    }
    writer.finish()
}
