//! 存储层集成测试，使用内存 SQLite

use sea_orm::{ConnectOptions, Database};

use skilllink::errors::SkillLinkError;
use skilllink::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use skilllink::models::attendance::entities::{AttendanceStatus, AttendanceUpsert};
use skilllink::models::cohorts::{
    entities::{Cohort, CohortRole},
    requests::CreateCohortRequest,
};
use skilllink::models::forum::{entities::ForumPost, requests::CreatePostRequest};
use skilllink::models::gamification::entities::{BadgeCriterion, NewBadge, PointAward, PointSource};
use skilllink::models::submissions::entities::NewSubmission;
use skilllink::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use skilllink::services::gamification::engine::rank_entries;
use skilllink::storage::Storage;
use skilllink::storage::sea_orm_storage::SeaOrmStorage;

async fn setup() -> SeaOrmStorage {
    // 内存库每个连接独立，必须限制为单连接
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    SeaOrmStorage::from_connection(db).await.unwrap()
}

async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hashed".to_string(),
            role,
            display_name: None,
            avatar_url: None,
        })
        .await
        .unwrap()
}

async fn cohort(storage: &SeaOrmStorage, created_by: i64) -> Cohort {
    storage
        .create_cohort(
            created_by,
            CreateCohortRequest {
                name: "Rust Cohort 1".to_string(),
                description: None,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap()
}

async fn assignment(storage: &SeaOrmStorage, cohort_id: i64, created_by: i64) -> Assignment {
    storage
        .create_assignment(
            created_by,
            CreateAssignmentRequest {
                cohort_id,
                title: "Ownership drills".to_string(),
                description: None,
                max_score: 100.0,
                due_date: None,
            },
        )
        .await
        .unwrap()
}

async fn post(storage: &SeaOrmStorage, author_id: i64, cohort_id: i64, title: &str) -> ForumPost {
    storage
        .create_forum_post(
            author_id,
            CreatePostRequest {
                cohort_id,
                title: title.to_string(),
                body: "details".to_string(),
            },
        )
        .await
        .unwrap()
}

async fn submit(storage: &SeaOrmStorage, assignment_id: i64, student_id: i64) -> i64 {
    storage
        .create_submission(NewSubmission {
            assignment_id,
            student_id,
            content: "done".to_string(),
            attachment_url: None,
            is_late: false,
        })
        .await
        .unwrap()
        .id
}

async fn mark(storage: &SeaOrmStorage, cohort_id: i64, user_id: i64, marked_by: i64) {
    storage
        .upsert_attendance(AttendanceUpsert {
            cohort_id,
            user_id,
            session_date: "2025-03-03".to_string(),
            status: AttendanceStatus::Present,
            note: None,
            marked_by,
        })
        .await
        .unwrap();
}

fn award(user_id: i64, source: PointSource, reference_id: i64, points: i32) -> PointAward {
    PointAward {
        user_id,
        cohort_id: None,
        source,
        reference_id,
        points,
    }
}

#[tokio::test]
async fn test_duplicate_submission_conflicts() {
    let storage = setup().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let student = user(&storage, "alice", UserRole::Student).await;
    let cohort = cohort(&storage, admin.id).await;
    let assignment = assignment(&storage, cohort.id, admin.id).await;

    let new_submission = || NewSubmission {
        assignment_id: assignment.id,
        student_id: student.id,
        content: "fn main() {}".to_string(),
        attachment_url: None,
        is_late: false,
    };

    let first = storage.create_submission(new_submission()).await.unwrap();
    assert_eq!(first.student_id, student.id);
    assert!(first.score.is_none());

    let second = storage.create_submission(new_submission()).await;
    assert!(matches!(second, Err(SkillLinkError::Conflict(_))));
}

#[tokio::test]
async fn test_duplicate_membership_conflicts() {
    let storage = setup().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let student = user(&storage, "alice", UserRole::Student).await;
    let cohort = cohort(&storage, admin.id).await;

    storage
        .add_cohort_member(cohort.id, student.id, CohortRole::Student)
        .await
        .unwrap();
    let again = storage
        .add_cohort_member(cohort.id, student.id, CohortRole::Facilitator)
        .await;
    assert!(matches!(again, Err(SkillLinkError::Conflict(_))));

    assert_eq!(
        storage
            .count_cohort_members(cohort.id, Some(CohortRole::Student))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_attendance_upsert_replaces_status() {
    let storage = setup().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let student = user(&storage, "alice", UserRole::Student).await;
    let cohort = cohort(&storage, admin.id).await;

    let mark = |status| AttendanceUpsert {
        cohort_id: cohort.id,
        user_id: student.id,
        session_date: "2025-03-03".to_string(),
        status,
        note: None,
        marked_by: admin.id,
    };

    let first = storage
        .upsert_attendance(mark(AttendanceStatus::Absent))
        .await
        .unwrap();
    let second = storage
        .upsert_attendance(mark(AttendanceStatus::Present))
        .await
        .unwrap();
    assert_eq!(first.id, second.id);

    let records = storage
        .list_attendance(cohort.id, Some("2025-03-03"), None)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, AttendanceStatus::Present);

    let stats = storage.get_user_stats(student.id).await.unwrap();
    assert_eq!(stats.attendance_present, 1);
}

#[tokio::test]
async fn test_solve_keeps_single_accepted_answer() {
    let storage = setup().await;
    let author = user(&storage, "alice", UserRole::Student).await;
    let helper = user(&storage, "bob", UserRole::Student).await;
    let cohort = cohort(&storage, author.id).await;

    let post = storage
        .create_forum_post(
            author.id,
            CreatePostRequest {
                cohort_id: cohort.id,
                title: "Borrow checker error".to_string(),
                body: "cannot borrow as mutable".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!post.is_solved);

    let first = storage
        .create_forum_answer(post.id, helper.id, "clone it".to_string())
        .await
        .unwrap();
    let second = storage
        .create_forum_answer(post.id, helper.id, "split the borrow".to_string())
        .await
        .unwrap();

    storage.solve_forum_post(post.id, first.id).await.unwrap();
    let (post, accepted) = storage
        .solve_forum_post(post.id, second.id)
        .await
        .unwrap()
        .unwrap();
    assert!(post.is_solved);
    assert_eq!(post.solved_answer_id, Some(second.id));
    assert_eq!(accepted.id, second.id);

    let answers = storage.list_forum_answers(post.id).await.unwrap();
    let accepted: Vec<i64> = answers
        .iter()
        .filter(|a| a.is_accepted)
        .map(|a| a.id)
        .collect();
    assert_eq!(accepted, vec![second.id]);

    // 其他帖子的回答不能被采纳
    let other = storage
        .create_forum_post(
            author.id,
            CreatePostRequest {
                cohort_id: cohort.id,
                title: "Lifetimes".to_string(),
                body: "what does 'a mean".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(
        storage
            .solve_forum_post(other.id, first.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_point_events_are_idempotent() {
    let storage = setup().await;
    let student = user(&storage, "alice", UserRole::Student).await;

    let event = storage
        .record_point_event(award(student.id, PointSource::Submission, 7, 10))
        .await
        .unwrap();
    assert!(event.is_some());

    let again = storage
        .record_point_event(award(student.id, PointSource::Submission, 7, 10))
        .await
        .unwrap();
    assert!(again.is_none());

    // 来源不同视为不同事件
    let bonus = storage
        .record_point_event(award(student.id, PointSource::OnTimeBonus, 7, 5))
        .await
        .unwrap();
    assert!(bonus.is_some());

    let events = storage.list_point_events(student.id).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(
        storage.get_user_stats(student.id).await.unwrap().total_points,
        15
    );
}

#[tokio::test]
async fn test_leaderboard_ordering() {
    let storage = setup().await;
    let alice = user(&storage, "alice", UserRole::Student).await;
    let bob = user(&storage, "bob", UserRole::Student).await;
    let carol = user(&storage, "carol", UserRole::Student).await;

    for (user_id, reference_id, points) in [
        (alice.id, 1, 10),
        (bob.id, 2, 10),
        (bob.id, 3, 5),
        (carol.id, 4, 15),
    ] {
        storage
            .record_point_event(award(user_id, PointSource::ForumPost, reference_id, points))
            .await
            .unwrap();
    }

    let totals = storage.sum_points_by_user(None).await.unwrap();
    let ranked = rank_entries(totals, 10);
    // 同分按用户 ID 升序
    assert_eq!(
        ranked,
        vec![(1, bob.id, 15), (2, carol.id, 15), (3, alice.id, 10)]
    );

    let scoped = storage
        .sum_points_by_user(Some(&[alice.id, carol.id]))
        .await
        .unwrap();
    assert_eq!(rank_entries(scoped, 1), vec![(1, carol.id, 15)]);
}

#[tokio::test]
async fn test_deleting_creator_keeps_cohort_content() {
    let storage = setup().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let facilitator = user(&storage, "fiona", UserRole::Facilitator).await;
    let student = user(&storage, "alice", UserRole::Student).await;
    let cohort = cohort(&storage, admin.id).await;
    let assignment = assignment(&storage, cohort.id, facilitator.id).await;
    let submission_id = submit(&storage, assignment.id, student.id).await;

    assert!(storage.delete_user(facilitator.id).await.unwrap());
    let kept = storage
        .get_assignment_by_id(assignment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.created_by, None);
    assert!(
        storage
            .get_submission_by_id(submission_id)
            .await
            .unwrap()
            .is_some()
    );

    assert!(storage.delete_user(admin.id).await.unwrap());
    let kept = storage.get_cohort_by_id(cohort.id).await.unwrap().unwrap();
    assert_eq!(kept.created_by, None);
    assert!(
        storage
            .get_assignment_by_id(assignment.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_deleting_user_removes_only_their_rows() {
    let storage = setup().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let alice = user(&storage, "alice", UserRole::Student).await;
    let bob = user(&storage, "bob", UserRole::Student).await;
    let cohort = cohort(&storage, admin.id).await;
    let assignment = assignment(&storage, cohort.id, admin.id).await;

    for student in [&alice, &bob] {
        storage
            .add_cohort_member(cohort.id, student.id, CohortRole::Student)
            .await
            .unwrap();
        mark(&storage, cohort.id, student.id, admin.id).await;
    }
    let alice_submission = submit(&storage, assignment.id, alice.id).await;
    let bob_submission = submit(&storage, assignment.id, bob.id).await;

    let alice_post = post(&storage, alice.id, cohort.id, "Traits").await;
    let bob_post = post(&storage, bob.id, cohort.id, "Generics").await;
    let bob_answer = storage
        .create_forum_answer(alice_post.id, bob.id, "use a trait object".to_string())
        .await
        .unwrap();
    storage
        .solve_forum_post(alice_post.id, bob_answer.id)
        .await
        .unwrap();

    let badge = storage
        .create_badge(NewBadge {
            code: "first_steps".to_string(),
            name: "First Steps".to_string(),
            description: None,
            icon: None,
            criterion: BadgeCriterion::Submissions,
            threshold: 1,
        })
        .await
        .unwrap();
    for student in [&alice, &bob] {
        assert!(storage.award_badge(student.id, badge.id).await.unwrap());
        storage
            .record_point_event(award(student.id, PointSource::Submission, 1, 10))
            .await
            .unwrap();
    }

    assert!(storage.delete_user(bob.id).await.unwrap());

    // bob 的数据全部删除
    assert!(storage.get_cohort_member(cohort.id, bob.id).await.unwrap().is_none());
    assert!(storage.get_submission_by_id(bob_submission).await.unwrap().is_none());
    assert!(storage.list_user_attendance(bob.id).await.unwrap().is_empty());
    assert!(storage.get_forum_post(bob_post.id).await.unwrap().is_none());
    assert!(storage.get_forum_answer(bob_answer.id).await.unwrap().is_none());
    assert!(storage.list_user_badges(bob.id).await.unwrap().is_empty());
    assert!(storage.list_point_events(bob.id).await.unwrap().is_empty());

    // alice 的数据不受影响，被采纳的回答没了，帖子回到未解决
    assert!(storage.get_cohort_member(cohort.id, alice.id).await.unwrap().is_some());
    assert!(storage.get_submission_by_id(alice_submission).await.unwrap().is_some());
    assert_eq!(storage.list_user_attendance(alice.id).await.unwrap().len(), 1);
    assert_eq!(storage.list_user_badges(alice.id).await.unwrap().len(), 1);
    assert_eq!(storage.list_point_events(alice.id).await.unwrap().len(), 1);
    let alice_post = storage.get_forum_post(alice_post.id).await.unwrap().unwrap();
    assert!(!alice_post.is_solved);
    assert_eq!(alice_post.solved_answer_id, None);
    assert!(storage.get_cohort_by_id(cohort.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_deleting_cohort_cascades() {
    let storage = setup().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let student = user(&storage, "alice", UserRole::Student).await;
    let cohort = cohort(&storage, admin.id).await;
    storage
        .add_cohort_member(cohort.id, student.id, CohortRole::Student)
        .await
        .unwrap();
    let assignment = assignment(&storage, cohort.id, admin.id).await;
    let submission_id = submit(&storage, assignment.id, student.id).await;
    mark(&storage, cohort.id, student.id, admin.id).await;
    let post = post(&storage, student.id, cohort.id, "Closures").await;
    let answer = storage
        .create_forum_answer(post.id, admin.id, "move semantics".to_string())
        .await
        .unwrap();
    storage
        .record_point_event(PointAward {
            cohort_id: Some(cohort.id),
            ..award(student.id, PointSource::ForumPost, post.id, 2)
        })
        .await
        .unwrap();

    assert!(storage.delete_cohort(cohort.id).await.unwrap());

    assert!(storage.get_cohort_by_id(cohort.id).await.unwrap().is_none());
    assert!(storage.get_cohort_member(cohort.id, student.id).await.unwrap().is_none());
    assert!(storage.get_assignment_by_id(assignment.id).await.unwrap().is_none());
    assert!(storage.get_submission_by_id(submission_id).await.unwrap().is_none());
    assert!(storage.list_attendance(cohort.id, None, None).await.unwrap().is_empty());
    assert!(storage.get_forum_post(post.id).await.unwrap().is_none());
    assert!(storage.get_forum_answer(answer.id).await.unwrap().is_none());

    // 用户与积分保留，积分不再关联班期
    assert!(storage.get_user_by_id(student.id).await.unwrap().is_some());
    let events = storage.list_point_events(student.id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].cohort_id, None);
}

#[tokio::test]
async fn test_self_accepted_answer_not_counted() {
    let storage = setup().await;
    let alice = user(&storage, "alice", UserRole::Student).await;
    let bob = user(&storage, "bob", UserRole::Student).await;
    let cohort = cohort(&storage, alice.id).await;

    let own = post(&storage, alice.id, cohort.id, "Answered it myself").await;
    let own_answer = storage
        .create_forum_answer(own.id, alice.id, "found it".to_string())
        .await
        .unwrap();
    storage.solve_forum_post(own.id, own_answer.id).await.unwrap();
    assert_eq!(storage.get_user_stats(alice.id).await.unwrap().accepted_answers, 0);

    let theirs = post(&storage, bob.id, cohort.id, "Async traits").await;
    let answer = storage
        .create_forum_answer(theirs.id, alice.id, "use async-trait".to_string())
        .await
        .unwrap();
    storage.solve_forum_post(theirs.id, answer.id).await.unwrap();
    assert_eq!(storage.get_user_stats(alice.id).await.unwrap().accepted_answers, 1);
}
