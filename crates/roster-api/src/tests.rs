use std::{collections::BTreeSet, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{NaiveDate, Utc};
use roster_core::{
  grade::Art,
  organisation::{Organisation, OrganisationMembership},
  person::{Person, User},
  roles::Role,
  school::{School, SchoolMembership},
  store::{Batch, Mutation, RecordStore},
};
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use super::*;

// ─── Fixtures ─────────────────────────────────────────────────────────────────

/// A seeded world:
///
/// - `club` is private; `admin` administers it, `member` and `secretary`
///   belong to it.
/// - `open` is public; only `outsider` belongs to it.
/// - `dojo` is a school of `club`; `secretary` is its active secretary and
///   `lapsed` a former one.
/// - `root` is a superuser with no memberships; `norole` holds no roles.
struct World {
  state:     AppState<SqliteStore>,
  club:      Uuid,
  open:      Uuid,
  dojo:      Uuid,
  art:       Uuid,
  admin:     Uuid,
  member:    Uuid,
  outsider:  Uuid,
  secretary: Uuid,
}

fn person(batch: &mut Batch, first_name: &str) -> Uuid {
  let id = Uuid::new_v4();
  batch.push(Mutation::InsertPerson(Person {
    id,
    first_name: first_name.to_string(),
    last_name: "Test".to_string(),
    created_at: Utc::now(),
  }));
  id
}

fn user(batch: &mut Batch, person_id: Uuid, subject: &str, roles: &[Role]) {
  batch.push(Mutation::InsertUser(User {
    id: Uuid::new_v4(),
    person_id,
    external_subject: Some(subject.to_string()),
    roles: roles.iter().copied().collect::<BTreeSet<_>>(),
  }));
}

fn join(batch: &mut Batch, organisation_id: Uuid, person_id: Uuid, is_admin: bool) {
  batch.push(Mutation::PutOrganisationMembership(OrganisationMembership {
    organisation_id,
    person_id,
    is_admin,
  }));
}

fn organisation(batch: &mut Batch, name: &str, is_public: bool) -> Uuid {
  let id = Uuid::new_v4();
  batch.push(Mutation::InsertOrganisation(Organisation {
    id,
    parent_id: None,
    name: name.to_string(),
    is_public,
  }));
  id
}

async fn world() -> World {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let mut b = Batch::new();

  let club = organisation(&mut b, "Club", false);
  let open = organisation(&mut b, "Open", true);

  let admin = person(&mut b, "Ada");
  let member = person(&mut b, "Max");
  let outsider = person(&mut b, "Olga");
  let secretary = person(&mut b, "Sam");
  let lapsed = person(&mut b, "Lee");
  let root = person(&mut b, "Rita");
  let norole = person(&mut b, "Nils");

  user(&mut b, admin, "admin", &[Role::OrganisationAdmin, Role::OrganisationMember]);
  user(&mut b, member, "member", &[Role::OrganisationMember]);
  user(&mut b, outsider, "outsider", &[Role::OrganisationAdmin, Role::OrganisationMember]);
  user(&mut b, secretary, "secretary", &[Role::SchoolSecretary]);
  user(&mut b, lapsed, "lapsed", &[Role::SchoolSecretary]);
  user(&mut b, root, "root", &[Role::Superuser]);
  user(&mut b, norole, "norole", &[]);

  join(&mut b, club, admin, true);
  join(&mut b, club, member, false);
  join(&mut b, club, secretary, false);
  join(&mut b, club, lapsed, false);
  join(&mut b, open, outsider, true);
  join(&mut b, open, root, false);
  join(&mut b, open, norole, false);

  let dojo = Uuid::new_v4();
  b.push(Mutation::InsertSchool(School {
    id:              dojo,
    organisation_id: club,
    name:            "Dojo".to_string(),
  }));
  b.push(Mutation::PutSchoolMembership(SchoolMembership {
    school_id:     dojo,
    person_id:     secretary,
    is_instructor: false,
    is_secretary:  true,
    inactive_date: None,
  }));
  b.push(Mutation::PutSchoolMembership(SchoolMembership {
    school_id:     dojo,
    person_id:     lapsed,
    is_instructor: false,
    is_secretary:  true,
    inactive_date: NaiveDate::from_ymd_opt(2020, 1, 1),
  }));

  let art = Uuid::new_v4();
  b.push(Mutation::InsertArt(Art { id: art, name: "Judo".to_string() }));

  assert!(store.commit(b).await.unwrap());

  World {
    state: AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig::default()),
    },
    club,
    open,
    dojo,
    art,
    admin,
    member,
    outsider,
    secretary,
  }
}

/// An unsigned compact JWT carrying `sub`.
fn bearer(subject: &str) -> String {
  let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
  let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": subject }).to_string());
  format!("Bearer {header}.{payload}.")
}

async fn oneshot_raw(
  state: AppState<SqliteStore>,
  method: &str,
  uri: &str,
  subject: Option<&str>,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(subject) = subject {
    builder = builder.header(header::AUTHORIZATION, bearer(subject));
  }
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  router(state).oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn text(resp: Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json_body(resp: Response) -> Value { serde_json::from_str(&text(resp).await).unwrap() }

async fn assert_forbidden(resp: Response, code: ErrorCode) {
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  let token: &'static str = code.into();
  assert_eq!(text(resp).await, token);
}

// ── Identity ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn me_returns_resolved_caller() {
  let w = world().await;
  let resp = oneshot_raw(w.state, "GET", "/me", Some("admin"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let me = json_body(resp).await;
  assert_eq!(me["personId"], json!(w.admin.to_string()));
  assert_eq!(me["roles"], json!(["OrganisationAdmin", "OrganisationMember"]));
}

#[tokio::test]
async fn missing_subject_is_401_even_for_unknown_ids() {
  let w = world().await;
  let uri = format!("/organisations/{}", Uuid::new_v4());
  let resp = oneshot_raw(w.state, "GET", &uri, None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(text(resp).await, "Auth token does not contain a valid user ID.");
}

#[tokio::test]
async fn unknown_subject_is_not_registered() {
  let w = world().await;
  let uri = format!("/organisations/{}", w.open);
  let resp = oneshot_raw(w.state, "GET", &uri, Some("stranger"), None).await;
  assert_forbidden(resp, ErrorCode::AzureUserNotRegistered).await;
}

#[tokio::test]
async fn provisioned_user_can_be_blocked() {
  let w = world().await;

  let body = json!({ "personId": w.outsider, "externalSubject": "second-login" });
  let resp = oneshot_raw(w.state.clone(), "POST", "/users", Some("root"), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let user_id = json_body(resp).await["id"].as_str().unwrap().to_string();

  let resp = oneshot_raw(w.state.clone(), "GET", "/me", Some("second-login"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let uri = format!("/users/{user_id}/block");
  let resp = oneshot_raw(w.state.clone(), "POST", &uri, Some("root"), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = oneshot_raw(w.state.clone(), "GET", "/me", Some("second-login"), None).await;
  assert_forbidden(resp, ErrorCode::AzureUserNotRegistered).await;

  // The account row survives.
  let user = w.state.store.get_user(user_id.parse().unwrap()).await.unwrap().unwrap();
  assert!(user.is_blocked());
}

#[tokio::test]
async fn only_superusers_provision() {
  let w = world().await;
  let body = json!({ "personId": w.member, "externalSubject": "x" });
  let resp = oneshot_raw(w.state, "POST", "/users", Some("admin"), Some(body)).await;
  assert_forbidden(resp, ErrorCode::InsufficientUserRole).await;
}

// ── Ordering ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_missing_reference_wins_over_permission() {
  let w = world().await;
  let (missing_art, missing_org) = (Uuid::new_v4(), Uuid::new_v4());

  // Both ids are missing; the art is declared first.
  let body = json!({ "organisationId": missing_org, "name": "Black belt", "rank": 1 });
  let uri = format!("/arts/{missing_art}/grades");
  let resp = oneshot_raw(w.state.clone(), "POST", &uri, Some("norole"), Some(body.clone())).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(text(resp).await, format!("Art ID '{missing_art}' not found."));

  let uri = format!("/arts/{}/grades", w.art);
  let resp = oneshot_raw(w.state, "POST", &uri, Some("norole"), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(text(resp).await, format!("Organisation ID '{missing_org}' not found."));
}

#[tokio::test]
async fn missing_reference_precedes_registration() {
  let w = world().await;
  let id = Uuid::new_v4();
  let uri = format!("/organisations/{id}");
  let resp = oneshot_raw(w.state, "GET", &uri, Some("stranger"), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validation_runs_before_everything() {
  let w = world().await;
  let uri = format!("/arts/{}/grades", Uuid::new_v4());
  let body = json!({ "organisationId": Uuid::new_v4() });
  let resp = oneshot_raw(w.state, "POST", &uri, None, Some(body)).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let errors = json_body(resp).await;
  assert!(errors.get("Name").is_some(), "{errors}");
  assert!(errors.get("Rank").is_some(), "{errors}");
  assert!(errors.get("OrganisationId").is_none(), "{errors}");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
  let w = world().await;
  let req = Request::builder()
    .method("POST")
    .uri("/schools")
    .header(header::AUTHORIZATION, bearer("admin"))
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{\"name\":"))
    .unwrap();
  let resp = router(w.state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let errors = json_body(resp).await;
  assert!(errors.get("$").is_some(), "{errors}");
}

#[tokio::test]
async fn malformed_path_id_is_not_found() {
  let w = world().await;
  let resp = oneshot_raw(w.state.clone(), "GET", "/organisations/not-a-uuid", Some("admin"), None)
    .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(text(resp).await, "Organisation ID 'not-a-uuid' not found.");

  // Declared order still decides which malformed id is reported.
  let resp =
    oneshot_raw(w.state.clone(), "DELETE", "/organisations/x/members/y", Some("admin"), None).await;
  assert_eq!(text(resp).await, "Organisation ID 'x' not found.");

  let uri = format!("/organisations/{}/members/y", w.club);
  let resp = oneshot_raw(w.state, "DELETE", &uri, Some("admin"), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(text(resp).await, "Person ID 'y' not found.");
}

#[tokio::test]
async fn malformed_path_id_yields_to_earlier_stages() {
  let w = world().await;

  let resp = oneshot_raw(w.state.clone(), "POST", "/arts/bad/grades", None, Some(json!({}))).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let errors = json_body(resp).await;
  for field in ["OrganisationId", "Name", "Rank"] {
    assert!(errors.get(field).is_some(), "{field} missing from {errors}");
  }

  let body = json!({ "organisationId": w.club, "name": "Brown", "rank": 3 });
  let resp =
    oneshot_raw(w.state.clone(), "POST", "/arts/bad/grades", None, Some(body.clone())).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = oneshot_raw(w.state, "POST", "/arts/bad/grades", Some("norole"), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(text(resp).await, "Art ID 'bad' not found.");
}

// ── Capability & scope ───────────────────────────────────────────────────────

#[tokio::test]
async fn role_check_precedes_scope() {
  let w = world().await;
  let uri = format!("/organisations/{}", w.club);
  let resp = oneshot_raw(w.state, "GET", &uri, Some("norole"), None).await;
  assert_forbidden(resp, ErrorCode::InsufficientUserRole).await;
}

#[tokio::test]
async fn organisation_admin_scope() {
  let w = world().await;
  let uri = format!("/organisations/{}/members/{}", w.club, w.secretary);
  let body = json!({ "isAdmin": true });

  let resp = oneshot_raw(w.state.clone(), "PUT", &uri, Some("member"), Some(body.clone())).await;
  // `member` lacks the admin role altogether.
  assert_forbidden(resp, ErrorCode::InsufficientUserRole).await;

  let resp = oneshot_raw(w.state.clone(), "PUT", &uri, Some("outsider"), Some(body.clone())).await;
  assert_forbidden(resp, ErrorCode::NoOrganisationAccess).await;

  let resp = oneshot_raw(w.state.clone(), "PUT", &uri, Some("admin"), Some(body.clone())).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["isAdmin"], json!(true));

  // Superusers need no membership.
  let resp = oneshot_raw(w.state, "PUT", &uri, Some("root"), Some(json!({ "isAdmin": false }))).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn member_without_admin_flag_is_not_admin() {
  let w = world().await;

  // Give `outsider` (who holds the admin role) a plain membership of `club`.
  let uri = format!("/organisations/{}/members/{}", w.club, w.outsider);
  let resp =
    oneshot_raw(w.state.clone(), "PUT", &uri, Some("admin"), Some(json!({ "isAdmin": false })))
      .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = json!({ "name": "Annex", "organisationId": w.club });
  let resp = oneshot_raw(w.state, "POST", "/schools", Some("outsider"), Some(body)).await;
  assert_forbidden(resp, ErrorCode::NotOrganisationAdmin).await;
}

#[tokio::test]
async fn public_organisations_are_readable_by_non_members() {
  let w = world().await;

  let uri = format!("/organisations/{}", w.open);
  let resp = oneshot_raw(w.state.clone(), "GET", &uri, Some("member"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["isPublic"], json!(true));

  let uri = format!("/organisations/{}", w.club);
  let resp = oneshot_raw(w.state, "GET", &uri, Some("outsider"), None).await;
  assert_forbidden(resp, ErrorCode::NoOrganisationAccess).await;
}

#[tokio::test]
async fn public_flag_does_not_grant_admin_operations() {
  let w = world().await;
  let uri = format!("/organisations/{}/people", w.open);
  let body = json!({ "firstName": "New", "lastName": "Person" });
  let resp = oneshot_raw(w.state, "POST", &uri, Some("admin"), Some(body)).await;
  assert_forbidden(resp, ErrorCode::NoOrganisationAccess).await;
}

#[tokio::test]
async fn school_secretary_scope() {
  let w = world().await;
  let uri = format!("/schools/{}/members/{}", w.dojo, w.member);
  let body = json!({ "isInstructor": true, "isSecretary": false });

  let resp = oneshot_raw(w.state.clone(), "PUT", &uri, Some("secretary"), Some(body.clone())).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["isInstructor"], json!(true));

  let resp = oneshot_raw(w.state.clone(), "PUT", &uri, Some("lapsed"), Some(body.clone())).await;
  assert_forbidden(resp, ErrorCode::NotSchoolSecretary).await;

  // An organisation admin without a school membership is reported the same way.
  let resp = oneshot_raw(w.state, "PUT", &uri, Some("admin"), Some(body)).await;
  assert_forbidden(resp, ErrorCode::NotSchoolSecretary).await;
}

#[tokio::test]
async fn school_member_must_belong_to_the_organisation() {
  let w = world().await;
  let uri = format!("/schools/{}/members/{}", w.dojo, w.outsider);
  let body = json!({ "isInstructor": false, "isSecretary": false });
  let resp = oneshot_raw(w.state, "PUT", &uri, Some("secretary"), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(
    text(resp).await,
    format!("Person '{}' not found in organisation '{}'", w.outsider, w.club)
  );
}

// ── Membership removal ───────────────────────────────────────────────────────

#[tokio::test]
async fn removing_last_membership_conflicts() {
  let w = world().await;
  let uri = format!("/organisations/{}/members/{}", w.club, w.member);
  let resp = oneshot_raw(w.state.clone(), "DELETE", &uri, Some("admin"), None).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert!(text(resp).await.contains(&w.member.to_string()));

  let still = w.state.store.get_organisation_membership(w.club, w.member).await.unwrap();
  assert!(still.is_some());
}

#[tokio::test]
async fn removing_one_of_two_memberships_succeeds() {
  let w = world().await;

  let uri = format!("/organisations/{}/members/{}", w.open, w.member);
  let resp =
    oneshot_raw(w.state.clone(), "PUT", &uri, Some("root"), Some(json!({ "isAdmin": false })))
      .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let uri = format!("/organisations/{}/members/{}", w.club, w.member);
  let resp = oneshot_raw(w.state.clone(), "DELETE", &uri, Some("admin"), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let gone = w.state.store.get_organisation_membership(w.club, w.member).await.unwrap();
  assert!(gone.is_none());
  assert_eq!(w.state.store.count_organisation_memberships(w.member).await.unwrap(), 1);
}

#[tokio::test]
async fn removing_absent_membership_is_404() {
  let w = world().await;
  let uri = format!("/organisations/{}/members/{}", w.club, w.outsider);
  let resp = oneshot_raw(w.state, "DELETE", &uri, Some("admin"), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(
    text(resp).await,
    format!("Person '{}' not found in organisation '{}'", w.outsider, w.club)
  );
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_members_filters_on_admin_flag() {
  let w = world().await;

  let uri = format!("/organisations/{}/members", w.club);
  let resp = oneshot_raw(w.state.clone(), "GET", &uri, Some("member"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await.as_array().unwrap().len(), 4);

  let uri = format!("/organisations/{}/members?isAdmin=true", w.club);
  let resp = oneshot_raw(w.state.clone(), "GET", &uri, Some("member"), None).await;
  let admins = json_body(resp).await;
  assert_eq!(admins.as_array().unwrap().len(), 1);
  assert_eq!(admins[0]["personId"], json!(w.admin.to_string()));

  let uri = format!("/organisations/{}/members?isAdmin=maybe", w.club);
  let resp = oneshot_raw(w.state, "GET", &uri, Some("member"), None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(text(resp).await, "The query parameter 'isAdmin' must be either 'true' or 'false'.");
}

#[tokio::test]
async fn bad_admin_flag_yields_to_identity_and_existence() {
  let w = world().await;

  let uri = format!("/organisations/{}/members?isAdmin=yes", w.club);
  let resp = oneshot_raw(w.state.clone(), "GET", &uri, None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(text(resp).await, "Auth token does not contain a valid user ID.");

  let missing = Uuid::new_v4();
  let uri = format!("/organisations/{missing}/members?isAdmin=yes");
  let resp = oneshot_raw(w.state.clone(), "GET", &uri, Some("member"), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let uri = format!("/organisations/{}/members?isAdmin=yes", w.club);
  let resp = oneshot_raw(w.state, "GET", &uri, Some("outsider"), None).await;
  assert_forbidden(resp, ErrorCode::NoOrganisationAccess).await;
}

// ── Creation ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn root_organisations_need_a_superuser() {
  let w = world().await;
  let body = json!({ "name": "Federation" });

  let resp = oneshot_raw(w.state.clone(), "POST", "/organisations", Some("admin"), Some(body.clone()))
    .await;
  assert_forbidden(resp, ErrorCode::InsufficientUserRole).await;

  let resp = oneshot_raw(w.state.clone(), "POST", "/organisations", Some("root"), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  assert_eq!(created["parentId"], Value::Null);

  // The creator becomes its admin.
  let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();
  let root_person = oneshot_raw(w.state.clone(), "GET", "/me", Some("root"), None).await;
  let root_person: Uuid =
    json_body(root_person).await["personId"].as_str().unwrap().parse().unwrap();
  let m = w.state.store.get_organisation_membership(id, root_person).await.unwrap().unwrap();
  assert!(m.is_admin);
}

#[tokio::test]
async fn admins_create_child_organisations() {
  let w = world().await;
  let body = json!({ "name": "Juniors", "parentId": w.club });
  let resp = oneshot_raw(w.state.clone(), "POST", "/organisations", Some("admin"), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(json_body(resp).await["parentId"], json!(w.club.to_string()));

  let body = json!({ "name": "Elsewhere", "parentId": w.open });
  let resp = oneshot_raw(w.state, "POST", "/organisations", Some("admin"), Some(body)).await;
  assert_forbidden(resp, ErrorCode::NoOrganisationAccess).await;
}

#[tokio::test]
async fn created_person_joins_the_organisation() {
  let w = world().await;
  let uri = format!("/organisations/{}/people", w.club);
  let body = json!({ "firstName": "  Kim ", "lastName": "Lo" });
  let resp = oneshot_raw(w.state.clone(), "POST", &uri, Some("admin"), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  assert_eq!(created["firstName"], json!("Kim"));

  let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();
  let m = w.state.store.get_organisation_membership(w.club, id).await.unwrap().unwrap();
  assert!(!m.is_admin);
}

#[tokio::test]
async fn admins_create_grades() {
  let w = world().await;
  let uri = format!("/arts/{}/grades", w.art);
  let body = json!({ "organisationId": w.club, "name": "Yellow", "rank": 2 });
  let resp = oneshot_raw(w.state, "POST", &uri, Some("admin"), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let grade = json_body(resp).await;
  assert_eq!(grade["artId"], json!(w.art.to_string()));
  assert_eq!(grade["rank"], json!(2));
}
