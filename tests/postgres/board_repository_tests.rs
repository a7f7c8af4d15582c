//! `PostgreSQL` board repository tests.

use std::collections::HashSet;

use super::helpers::{PgContext, shared_test_cluster};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::rstest;
use taskboard::board::{
    domain::{Board, MAX_TITLE_LENGTH, Role, TaskDraft, UserId},
    ports::{BoardRepository, BoardRepositoryError},
};
use taskboard::error::ErrorKind;

fn sprint_board(owner: UserId) -> Board {
    let clock = DefaultClock;
    let mut board = Board::new(owner, "Sprint", &clock).expect("valid board");
    let todo = board.add_column("Todo", &clock).expect("valid column");
    board
        .add_task(
            todo,
            TaskDraft::new("Fix bug").with_tags(vec!["backend".to_owned()]),
            &clock,
        )
        .expect("valid task");
    board
}

#[rstest]
fn stored_board_document_reads_back(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let board = sprint_board(UserId::new());

    ctx.runtime
        .block_on(ctx.board_repository.store(&board))
        .expect("store succeeds");
    let restored = ctx
        .runtime
        .block_on(ctx.board_repository.find_by_id(board.id()))
        .expect("lookup succeeds")
        .expect("board exists");

    assert_eq!(restored.title(), "Sprint");
    assert_eq!(restored.owner_id(), board.owner_id());
    assert_eq!(restored.columns(), board.columns());
    assert_eq!(restored.task_count(), 1);
}

#[rstest]
fn storing_same_board_twice_is_duplicate(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let board = sprint_board(UserId::new());

    ctx.runtime
        .block_on(ctx.board_repository.store(&board))
        .expect("first store succeeds");
    let result = ctx.runtime.block_on(ctx.board_repository.store(&board));

    assert!(matches!(
        result,
        Err(BoardRepositoryError::DuplicateBoard(id)) if id == board.id()
    ));
}

#[rstest]
fn update_and_delete_of_missing_board_are_not_found(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let board = sprint_board(UserId::new());

    let updated = ctx.runtime.block_on(ctx.board_repository.update(&board));
    let deleted = ctx.runtime.block_on(ctx.board_repository.delete(board.id()));

    assert!(matches!(updated, Err(BoardRepositoryError::NotFound(_))));
    assert!(matches!(deleted, Err(BoardRepositoryError::NotFound(_))));
}

#[rstest]
fn listing_matches_owners_and_members_only(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let (owner, member, stranger) = (UserId::new(), UserId::new(), UserId::new());
    let mut shared = sprint_board(owner);
    let private = sprint_board(owner);

    ctx.runtime
        .block_on(ctx.board_repository.store(&shared))
        .expect("store shared");
    ctx.runtime
        .block_on(ctx.board_repository.store(&private))
        .expect("store private");
    shared
        .grant_membership(member, Role::Viewer, &DefaultClock)
        .expect("member is not the owner");
    ctx.runtime
        .block_on(ctx.board_repository.update(&shared))
        .expect("update succeeds");

    let for_owner = ctx
        .runtime
        .block_on(ctx.board_repository.list_for_participant(owner))
        .expect("owner listing");
    let for_member = ctx
        .runtime
        .block_on(ctx.board_repository.list_for_participant(member))
        .expect("member listing");
    let for_stranger = ctx
        .runtime
        .block_on(ctx.board_repository.list_for_participant(stranger))
        .expect("stranger listing");

    let owner_ids: HashSet<_> = for_owner.iter().map(Board::id).collect();
    assert_eq!(owner_ids, HashSet::from([shared.id(), private.id()]));
    let member_ids: Vec<_> = for_member.iter().map(Board::id).collect();
    assert_eq!(member_ids, vec![shared.id()]);
    assert!(for_stranger.is_empty());
}

#[rstest]
fn revoked_member_drops_out_of_listing(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let (owner, member) = (UserId::new(), UserId::new());
    let board = ctx
        .runtime
        .block_on(ctx.boards.create_board(owner, "Sprint"))
        .expect("board created");
    let mut granted = board.clone();
    granted
        .grant_membership(member, Role::Admin, &DefaultClock)
        .expect("member is not the owner");
    ctx.runtime
        .block_on(ctx.board_repository.update(&granted))
        .expect("update succeeds");

    ctx.runtime
        .block_on(ctx.boards.remove_member(board.id(), owner, member))
        .expect("owner removes member");
    let listed = ctx
        .runtime
        .block_on(ctx.boards.list_boards(member))
        .expect("listing succeeds");

    assert!(listed.is_empty());
}

#[rstest]
#[case("x".repeat(MAX_TITLE_LENGTH))]
#[case("é".repeat(MAX_TITLE_LENGTH))]
fn longest_accepted_title_fits_the_column(
    shared_test_cluster: &'static TestCluster,
    #[case] title: String,
) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let owner = UserId::new();

    let board = ctx
        .runtime
        .block_on(ctx.boards.create_board(owner, title.as_str()))
        .expect("title at the limit is stored");
    let stored = ctx
        .runtime
        .block_on(ctx.boards.get_board(board.id(), owner))
        .expect("owner can read");

    assert_eq!(stored.title(), title);
}

#[rstest]
fn overlong_title_is_rejected_before_storage(shared_test_cluster: &'static TestCluster) {
    let ctx = PgContext::new(shared_test_cluster).expect("database setup");
    let owner = UserId::new();
    let long_title = "x".repeat(MAX_TITLE_LENGTH + 1);

    let err = ctx
        .runtime
        .block_on(ctx.boards.create_board(owner, long_title.as_str()))
        .expect_err("title too long");
    let listed = ctx
        .runtime
        .block_on(ctx.boards.list_boards(owner))
        .expect("listing succeeds");

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(listed.is_empty());
}
