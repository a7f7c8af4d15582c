//! Given steps for board collaboration BDD scenarios.

use super::world::{CollaborationWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::board::domain::{Role, TaskDraft};
use taskboard::invitation::services::CreateInvitationRequest;

#[given(r#"user "{owner}" owns a board titled "{title}""#)]
fn user_owns_board(
    world: &mut CollaborationWorld,
    owner: String,
    title: String,
) -> Result<(), eyre::Report> {
    let owner_id = world.user(&owner);
    let board = run_async(world.boards.create_board(owner_id, title))
        .wrap_err("create board for scenario")?;
    world.owner = Some(owner_id);
    world.board_id = Some(board.id());
    Ok(())
}

#[given(r#"the board has a column "{title}""#)]
fn board_has_column(world: &mut CollaborationWorld, title: String) -> Result<(), eyre::Report> {
    let board_id = world.board_id()?;
    let owner = world
        .owner
        .ok_or_else(|| eyre::eyre!("missing owner in scenario world"))?;
    run_async(world.boards.add_column(board_id, owner, title))
        .wrap_err("add column for scenario")?;
    Ok(())
}

#[given(r#"the column "{column}" has a task "{task}""#)]
fn column_has_task(
    world: &mut CollaborationWorld,
    column: String,
    task: String,
) -> Result<(), eyre::Report> {
    let board = world.board_as_owner()?;
    let column_id = board
        .columns()
        .iter()
        .find(|candidate| candidate.title() == column)
        .map(taskboard::board::domain::Column::id)
        .ok_or_else(|| eyre::eyre!("no column titled {column}"))?;
    let owner = board.owner_id();
    run_async(
        world
            .boards
            .add_task(board.id(), owner, column_id, TaskDraft::new(task)),
    )
    .wrap_err("add task for scenario")?;
    Ok(())
}

#[given(r#""{member}" has joined the board as "{role_name}""#)]
fn member_has_joined(
    world: &mut CollaborationWorld,
    member: String,
    role_name: String,
) -> Result<(), eyre::Report> {
    let role = Role::try_from(role_name.as_str()).wrap_err("parse scenario role")?;
    let member_id = world.user(&member);
    let board_id = world.board_id()?;
    let owner = world
        .owner
        .ok_or_else(|| eyre::eyre!("missing owner in scenario world"))?;

    let invitation = run_async(
        world
            .invitations
            .create(owner, CreateInvitationRequest::new(board_id, member_id, role)),
    )
    .wrap_err("invite member for scenario")?;
    run_async(world.invitations.accept(invitation.id(), member_id))
        .wrap_err("accept invitation for scenario")?;
    Ok(())
}
