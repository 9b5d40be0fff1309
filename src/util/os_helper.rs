/// Real name of the OS user, falling back to the login name
pub fn get_name() -> String {
    let name = whoami::realname();
    if name.trim().is_empty() {
        return whoami::username();
    }
    name
}
