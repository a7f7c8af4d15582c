//! `PostgreSQL` invitation repository tests.

use super::helpers::{PgContext, shared_test_cluster};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::rstest;
use taskboard::board::{
    domain::{Board, BoardId, Role, UserId},
    ports::BoardRepository,
};
use taskboard::error::ErrorKind;
use taskboard::invitation::{
    domain::{Invitation, InvitationParams, InvitationStatus},
    ports::{InvitationRepository, InvitationRepositoryError},
    services::{CreateInvitationRequest, InvitationServiceError},
};

fn invitation_for(board: &Board, invitee: UserId, role: Role) -> Invitation {
    Invitation::new(
        InvitationParams {
            board_id: board.id(),
            from_user_id: board.owner_id(),
            to_user_id: invitee,
            role,
        },
        &DefaultClock,
    )
}

fn stored_board(ctx: &PgContext) -> Board {
    let board = Board::new(UserId::new(), "Sprint", &DefaultClock).expect("valid board");
    ctx.runtime
        .block_on(ctx.board_repository.store(&board))
        .expect("board stored");
    board
}

// ── Pending pair uniqueness ───────────────────────────────────────

#[rstest]
fn second_pending_row_for_pair_is_rejected(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let board = stored_board(&ctx);
    let invitee = UserId::new();
    let first = invitation_for(&board, invitee, Role::Viewer);
    let second = invitation_for(&board, invitee, Role::Editor);

    ctx.runtime
        .block_on(ctx.invitation_repository.store(&first))
        .expect("first invitation stored");
    let err = ctx
        .runtime
        .block_on(ctx.invitation_repository.store(&second))
        .expect_err("pair already pending");

    assert!(matches!(
        err,
        InvitationRepositoryError::PendingInvitationExists { board_id, invitee: who }
            if board_id == board.id() && who == invitee
    ));
    assert_eq!(
        InvitationServiceError::from(err).kind(),
        ErrorKind::DuplicateInvitation
    );
}

#[rstest]
fn storing_same_invitation_twice_is_duplicate(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let board = stored_board(&ctx);
    let invitation = invitation_for(&board, UserId::new(), Role::Viewer);
    let mut rejected = invitation.clone();
    rejected
        .reject(invitation.to_user_id(), &DefaultClock)
        .expect("invitee may reject");

    ctx.runtime
        .block_on(ctx.invitation_repository.store(&rejected))
        .expect("rejected invitation stored");
    let result = ctx
        .runtime
        .block_on(ctx.invitation_repository.store(&invitation));

    assert!(matches!(
        result,
        Err(InvitationRepositoryError::DuplicateInvitation(id)) if id == invitation.id()
    ));
}

#[rstest]
fn concurrent_invites_leave_one_pending(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let owner = UserId::new();
    let invitee = UserId::new();
    let board = ctx
        .runtime
        .block_on(ctx.boards.create_board(owner, "Sprint"))
        .expect("board created");

    let (first, second) = ctx.runtime.block_on(async {
        tokio::join!(
            ctx.invitations.create(
                owner,
                CreateInvitationRequest::new(board.id(), invitee, Role::Viewer)
            ),
            ctx.invitations.create(
                owner,
                CreateInvitationRequest::new(board.id(), invitee, Role::Editor)
            ),
        )
    });

    let failures: Vec<ErrorKind> = [first, second]
        .into_iter()
        .filter_map(|result| result.err().map(|err| err.kind()))
        .collect();
    assert_eq!(failures, vec![ErrorKind::DuplicateInvitation]);
    let pending = ctx
        .runtime
        .block_on(ctx.invitations.list_pending(invitee))
        .expect("listing succeeds");
    assert_eq!(pending.len(), 1);
}

// ── Decisions ─────────────────────────────────────────────────────

#[rstest]
fn stale_acceptance_is_no_longer_pending(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let board = stored_board(&ctx);
    let invitee = UserId::new();
    let invitation = invitation_for(&board, invitee, Role::Editor);
    ctx.runtime
        .block_on(ctx.invitation_repository.store(&invitation))
        .expect("invitation stored");

    let mut granted = board.clone();
    granted
        .grant_membership(invitee, Role::Editor, &DefaultClock)
        .expect("invitee is not the owner");
    let mut winner = invitation.clone();
    winner
        .accept(invitee, &DefaultClock)
        .expect("pending invitation accepts");
    let mut loser = invitation.clone();
    loser
        .reject(invitee, &DefaultClock)
        .expect("pending invitation rejects");

    ctx.runtime
        .block_on(ctx.invitation_repository.commit_acceptance(&winner, &granted))
        .expect("first decision commits");
    let err = ctx
        .runtime
        .block_on(ctx.invitation_repository.commit_rejection(&loser))
        .expect_err("second decision loses");

    assert!(matches!(
        err,
        InvitationRepositoryError::NoLongerPending(id) if id == invitation.id()
    ));
    assert_eq!(
        InvitationServiceError::from(err).kind(),
        ErrorKind::InvalidStateTransition
    );
    let stored = ctx
        .runtime
        .block_on(ctx.invitation_repository.find_by_id(invitation.id()))
        .expect("lookup succeeds")
        .expect("invitation exists");
    assert_eq!(stored.status(), InvitationStatus::Accepted);
}

#[rstest]
fn decision_on_unknown_invitation_is_not_found(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let board = stored_board(&ctx);
    let invitee = UserId::new();
    let mut invitation = invitation_for(&board, invitee, Role::Viewer);
    invitation
        .reject(invitee, &DefaultClock)
        .expect("pending invitation rejects");

    let result = ctx
        .runtime
        .block_on(ctx.invitation_repository.commit_rejection(&invitation));

    assert!(matches!(
        result,
        Err(InvitationRepositoryError::NotFound(id)) if id == invitation.id()
    ));
}

#[rstest]
fn concurrent_accepts_grant_membership_once(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let owner = UserId::new();
    let invitee = UserId::new();
    let board = ctx
        .runtime
        .block_on(ctx.boards.create_board(owner, "Sprint"))
        .expect("board created");
    let invitation = ctx
        .runtime
        .block_on(ctx.invitations.create(
            owner,
            CreateInvitationRequest::new(board.id(), invitee, Role::Editor),
        ))
        .expect("owner may invite");

    let (first, second) = ctx.runtime.block_on(async {
        tokio::join!(
            ctx.invitations.accept(invitation.id(), invitee),
            ctx.invitations.accept(invitation.id(), invitee),
        )
    });

    let failures: Vec<ErrorKind> = [first, second]
        .into_iter()
        .filter_map(|result| result.err().map(|err| err.kind()))
        .collect();
    assert_eq!(failures, vec![ErrorKind::InvalidStateTransition]);
    let shared = ctx
        .runtime
        .block_on(ctx.boards.get_board(board.id(), invitee))
        .expect("member can read");
    assert_eq!(shared.members().len(), 1);
    assert_eq!(
        shared.membership_of(invitee).map(|m| m.role()),
        Some(Role::Editor)
    );
}

#[rstest]
fn acceptance_rolls_back_when_board_is_gone(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let board = stored_board(&ctx);
    let invitee = UserId::new();
    let invitation = invitation_for(&board, invitee, Role::Viewer);
    ctx.runtime
        .block_on(ctx.invitation_repository.store(&invitation))
        .expect("invitation stored");
    ctx.runtime
        .block_on(ctx.board_repository.delete(board.id()))
        .expect("board deleted");

    let mut granted = board.clone();
    granted
        .grant_membership(invitee, Role::Viewer, &DefaultClock)
        .expect("invitee is not the owner");
    let mut accepted = invitation.clone();
    accepted
        .accept(invitee, &DefaultClock)
        .expect("pending invitation accepts");
    let result = ctx
        .runtime
        .block_on(ctx.invitation_repository.commit_acceptance(&accepted, &granted));

    assert!(matches!(
        result,
        Err(InvitationRepositoryError::BoardNotFound(id)) if id == board.id()
    ));
    let stored = ctx
        .runtime
        .block_on(ctx.invitation_repository.find_by_id(invitation.id()))
        .expect("lookup succeeds")
        .expect("invitation exists");
    assert_eq!(stored.status(), InvitationStatus::Pending);
}

#[rstest]
fn orphaned_invitation_can_still_be_rejected(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let owner = UserId::new();
    let invitee = UserId::new();
    let board = ctx
        .runtime
        .block_on(ctx.boards.create_board(owner, "Sprint"))
        .expect("board created");
    let invitation = ctx
        .runtime
        .block_on(ctx.invitations.create(
            owner,
            CreateInvitationRequest::new(board.id(), invitee, Role::Viewer),
        ))
        .expect("owner may invite");
    ctx.runtime
        .block_on(ctx.boards.delete_board(board.id(), owner))
        .expect("owner deletes board");

    let accept_err = ctx
        .runtime
        .block_on(ctx.invitations.accept(invitation.id(), invitee))
        .expect_err("board is gone");
    let rejected = ctx
        .runtime
        .block_on(ctx.invitations.reject(invitation.id(), invitee))
        .expect("reject still succeeds");

    assert_eq!(accept_err.kind(), ErrorKind::NotFound);
    assert_eq!(rejected.status(), InvitationStatus::Rejected);
}

// ── Listing ───────────────────────────────────────────────────────

#[rstest]
fn pending_listing_skips_decided_invitations(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let invitee = UserId::new();
    let boards: Vec<Board> = (0..3).map(|_| stored_board(&ctx)).collect();
    let invitations: Vec<Invitation> = boards
        .iter()
        .map(|board| invitation_for(board, invitee, Role::Viewer))
        .collect();
    for invitation in &invitations {
        ctx.runtime
            .block_on(ctx.invitation_repository.store(invitation))
            .expect("invitation stored");
    }
    let mut rejected = invitations.first().expect("three invitations").clone();
    rejected
        .reject(invitee, &DefaultClock)
        .expect("pending invitation rejects");
    ctx.runtime
        .block_on(ctx.invitation_repository.commit_rejection(&rejected))
        .expect("rejection commits");

    let pending = ctx
        .runtime
        .block_on(ctx.invitation_repository.list_pending_for_invitee(invitee))
        .expect("listing succeeds");
    let listed_boards: Vec<BoardId> = pending.iter().map(Invitation::board_id).collect();

    assert_eq!(pending.len(), 2);
    assert!(!listed_boards.contains(&rejected.board_id()));
    assert!(
        pending
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.created_at() <= b.created_at()))
    );
}
