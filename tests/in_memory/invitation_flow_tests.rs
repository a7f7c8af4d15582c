//! In-memory integration tests for invitation-mediated collaboration.

use std::sync::Arc;

use super::helpers::{Services, column_named, services, task_named};
use rstest::rstest;
use taskboard::board::{
    domain::{Role, TaskDraft, UserId},
    services::MoveTaskRequest,
};
use taskboard::error::ErrorKind;
use taskboard::invitation::{domain::InvitationStatus, services::CreateInvitationRequest};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sprint_collaboration_walkthrough(services: Services) -> eyre::Result<()> {
    let (u1, u2, u3) = (UserId::new(), UserId::new(), UserId::new());

    let board = services.boards.create_board(u1, "Sprint").await?;
    eyre::ensure!(board.columns().is_empty(), "new board has columns");
    let board_id = board.id();

    let with_todo = services.boards.add_column(board_id, u1, "Todo").await?;
    eyre::ensure!(with_todo.columns().len() == 1, "expected one column");
    eyre::ensure!(with_todo.task_count() == 0, "expected no tasks");
    let todo = column_named(&with_todo, "Todo")?;

    let with_task = services
        .boards
        .add_task(board_id, u1, todo, TaskDraft::new("Fix bug"))
        .await?;
    eyre::ensure!(with_task.task_count() == 1, "expected one task");

    let invitation = services
        .invitations
        .create(u1, CreateInvitationRequest::new(board_id, u2, Role::Editor))
        .await?;
    eyre::ensure!(invitation.status() == InvitationStatus::Pending, "not pending");

    let accepted = services.invitations.accept(invitation.id(), u2).await?;
    eyre::ensure!(accepted.status() == InvitationStatus::Accepted, "not accepted");
    let shared = services.boards.get_board(board_id, u2).await?;
    eyre::ensure!(
        shared.membership_of(u2).map(|m| m.role()) == Some(Role::Editor),
        "u2 should be an editor"
    );

    let with_doing = services.boards.add_column(board_id, u2, "Doing").await?;
    let doing = column_named(&with_doing, "Doing")?;
    let fix_bug = task_named(&with_doing, todo, "Fix bug")?;
    let moved = services
        .boards
        .move_task(board_id, u2, MoveTaskRequest::new(fix_bug, todo, doing))
        .await?;
    let todo_tasks = moved.column(todo).map(|c| c.tasks().len());
    let doing_titles: Option<Vec<&str>> = moved
        .column(doing)
        .map(|c| c.tasks().iter().map(taskboard::board::domain::Task::title).collect());
    eyre::ensure!(todo_tasks == Some(0), "Todo should be empty");
    eyre::ensure!(
        doing_titles == Some(vec!["Fix bug"]),
        "Doing should hold Fix bug, got {doing_titles:?}"
    );

    let denied = services.boards.get_board(board_id, u3).await;
    let Err(err) = denied else {
        eyre::bail!("u3 must not read the board");
    };
    eyre::ensure!(err.kind() == ErrorKind::Forbidden, "expected forbidden, got {}", err.kind());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_accepts_grant_one_membership(services: Services) -> eyre::Result<()> {
    let owner = UserId::new();
    let invitee = UserId::new();
    let board = services.boards.create_board(owner, "Sprint").await?;
    let invitation = services
        .invitations
        .create(owner, CreateInvitationRequest::new(board.id(), invitee, Role::Viewer))
        .await?;

    let shared = Arc::new(services.invitations);
    let first = Arc::clone(&shared);
    let second = Arc::clone(&shared);
    let id = invitation.id();
    let (left, right) = tokio::join!(
        tokio::spawn(async move { first.accept(id, invitee).await }),
        tokio::spawn(async move { second.accept(id, invitee).await }),
    );
    let outcomes = [left?, right?];

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    eyre::ensure!(successes == 1, "expected exactly one acceptance, got {successes}");
    for outcome in &outcomes {
        if let Err(err) = outcome {
            eyre::ensure!(
                err.kind() == ErrorKind::InvalidStateTransition,
                "loser should see an invalid transition, got {}",
                err.kind()
            );
        }
    }
    let stored = services.boards.get_board(board.id(), owner).await?;
    eyre::ensure!(stored.members().len() == 1, "membership duplicated");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_invitations_are_listed_oldest_first(services: Services) -> eyre::Result<()> {
    let invitee = UserId::new();
    let mut expected = Vec::new();
    for title in ["Alpha", "Beta", "Gamma"] {
        let owner = UserId::new();
        let board = services.boards.create_board(owner, title).await?;
        let invitation = services
            .invitations
            .create(owner, CreateInvitationRequest::new(board.id(), invitee, Role::Viewer))
            .await?;
        expected.push(invitation.id());
    }

    let listed: Vec<_> = services
        .invitations
        .list_pending(invitee)
        .await?
        .iter()
        .map(taskboard::invitation::domain::Invitation::id)
        .collect();
    eyre::ensure!(listed == expected, "unexpected order");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepted_member_sees_board_in_listing(services: Services) -> eyre::Result<()> {
    let owner = UserId::new();
    let member = UserId::new();
    let board = services.boards.create_board(owner, "Shared").await?;
    let invitation = services
        .invitations
        .create(owner, CreateInvitationRequest::new(board.id(), member, Role::Viewer))
        .await?;

    eyre::ensure!(
        services.boards.list_boards(member).await?.is_empty(),
        "board visible before acceptance"
    );
    services.invitations.accept(invitation.id(), member).await?;

    let listed = services.boards.list_boards(member).await?;
    eyre::ensure!(
        listed.iter().map(taskboard::board::domain::Board::id).eq([board.id()]),
        "board missing from member listing"
    );
    Ok(())
}
