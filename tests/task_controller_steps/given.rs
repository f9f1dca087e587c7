//! Given steps for task controller BDD scenarios.

use super::world::ControllerWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::user::domain::NewUser;

#[given(r#"a registered user "{username}""#)]
fn registered_user(world: &mut ControllerWorld, username: String) -> Result<(), eyre::Report> {
    let email = format!("{username}@example.com");
    world
        .users
        .create(NewUser::new(username, email))
        .wrap_err("register scenario user")?;
    Ok(())
}

#[given(r#""{username}" is logged in"#)]
fn user_is_logged_in(world: &mut ControllerWorld, username: String) -> Result<(), eyre::Report> {
    world.log_in(&username)
}
