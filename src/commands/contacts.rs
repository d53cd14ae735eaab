use crate::services::contacts_service;
use crate::AppContext;

pub fn execute(ctx: &AppContext, args: &[&str]) -> Result<String, String> {
    if ctx.contacts.is_empty() {
        return Err("No contacts loaded. Set CONTACTS_FILE to a JSON export of your contacts".to_string());
    }

    let query = args.join(" ");
    let sections = ctx.contacts.search(&query);
    Ok(format!(
        "👥 Contactos\n{}",
        contacts_service::render_sections(&sections)
    ))
}
