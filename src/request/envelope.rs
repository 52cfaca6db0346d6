//! Request envelope rendering
//!
//! ```text
//! <request>
//!   <control>senderid, password, controlid, uniqueid, dtdversion, includewhitespace</control>
//!   <operation transaction="false">
//!     <authentication><sessionid/> | <login/></authentication>
//!     <content>...</content>
//!   </operation>
//! </request>
//! ```

use crate::content::Content;
use crate::error::{Error, Result};
use crate::types::Params;
use crate::xml::XmlWriter;

/// Gateway DTD version this SDK speaks
pub const DTD_VERSION: &str = "3.0";

/// Render the full request document for `content` using credentials in `config`
///
/// Requires `sender_id` and `sender_password`, plus either `session_id` or
/// `company_id`, `user_id` and `user_password`.
pub fn build_request(config: &Params, content: &Content) -> Result<String> {
    if content.is_empty() {
        return Err(Error::config(
            "Request content must contain at least one function",
        ));
    }

    let sender_id = config.require_str("sender_id")?;
    let sender_password = config.require_str("sender_password")?;
    let control_id = config
        .get_str("control_id")?
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let unique_id = config.get_bool("unique_id")?.unwrap_or(false);
    let transaction = config.get_bool("transaction")?.unwrap_or(false);

    let mut writer = XmlWriter::with_declaration();
    writer
        .start("request")
        .start("control")
        .element("senderid", &sender_id)
        .element("password", &sender_password)
        .element("controlid", &control_id)
        .element("uniqueid", bool_str(unique_id))
        .element("dtdversion", DTD_VERSION)
        .element("includewhitespace", "false")
        .end();

    writer.start_with_attrs("operation", &[("transaction", bool_str(transaction))]);
    write_authentication(&mut writer, config)?;
    content.write_xml(&mut writer);
    writer.end().end();

    Ok(writer.finish())
}

fn write_authentication(writer: &mut XmlWriter, config: &Params) -> Result<()> {
    writer.start("authentication");

    match config
        .get_str("session_id")?
        .filter(|id| !id.trim().is_empty())
    {
        Some(session_id) => {
            writer.element("sessionid", &session_id);
        }
        None => {
            let company_id = config.require_str("company_id")?;
            let user_id = config.require_str("user_id")?;
            let user_password = config.require_str("user_password")?;
            writer
                .start("login")
                .element("userid", &user_id)
                .element("companyid", &company_id)
                .element("password", &user_password)
                .end();
        }
    }

    writer.end();
    Ok(())
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
