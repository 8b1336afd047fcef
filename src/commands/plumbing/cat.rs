use crate::areas::repository::Repository;
use crate::artifacts::objects::cid::Cid;
use std::io::Write;

impl Repository {
    /// Print the IPLD node form of a stored object, pretty-printed.
    ///
    /// Raw content blocks are not nodes; they are printed as-is.
    pub async fn cat(&mut self, cid: &str) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_shared()?;

        let cid = Cid::try_parse(cid)?;
        match self.store().get_node(&cid) {
            Ok(node) => {
                writeln!(self.writer(), "{}", serde_json::to_string_pretty(&node)?)?;
            }
            Err(_) => {
                let bytes = self.store().download(&cid, true)?;
                self.writer().write_all(&bytes)?;
            }
        }

        Ok(())
    }
}
