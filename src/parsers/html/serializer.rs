use std::io;

use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};

/// Serializes the whole document back into HTML text.
pub fn serialize_document(dom: &RcDom) -> io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &serializable, SerializeOpts::default())?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
