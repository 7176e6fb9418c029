use propdeck_api_client::PropdeckApiClient;
use propdeck_common::models::{
    error::ApiError,
    member::MemberRole,
    outline::{OutlineCreateRequest, OutlineStatus, SectionType},
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> PropdeckApiClient {
    PropdeckApiClient::new(server.uri(), Some(5))
}

#[tokio::test]
async fn session_cookie_is_stored_and_replayed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/sign-in/email"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "better-auth.session_token=tok123; Path=/")
                .set_body_json(json!({
                    "user": { "id": "u1", "email": "a@x.io", "name": "A" }
                })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .and(header("cookie", "better-auth.session_token=tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": "u1", "email": "a@x.io", "name": "A" },
            "session": { "id": "s1", "activeOrganizationId": null }
        })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    client.sign_in("a@x.io", "hunter2").await.unwrap();

    let session = client.get_session().await.unwrap().into_inner().unwrap();
    assert_eq!(session.user.id, "u1");
    assert_eq!(session.session.active_organization_id, None);
}

#[tokio::test]
async fn error_bodies_decode_into_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/organization/invite-member"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "You are not allowed to invite members",
            "status_code": 403
        })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let err = client
        .invite_member("org_1", "b@x.io", MemberRole::Member)
        .await
        .unwrap_err();

    let api_error = err.downcast_ref::<ApiError>().expect("should be an ApiError");
    assert_eq!(api_error.status_code, 403);
    assert_eq!(api_error.message, "You are not allowed to invite members");
}

#[tokio::test]
async fn member_list_is_normalized_at_the_boundary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/organization/list-members"))
        .and(query_param("organizationId", "org_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "members": [
            { "userId": "u1", "role": "owner", "email": "a@x.io", "name": "A" },
            { "id": "u2", "role": "member", "user": { "email": "b@x.io", "name": "B" } },
            { "userId": "u1", "role": "owner", "email": "a@x.io", "name": "A dup" },
            { "email": "malformed@x.io" }
        ]})))
        .mount(&server)
        .await;

    let members = client(&server).await.list_members("org_1").await.unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].user_id, "u1");
    assert_eq!(members[1].email, "b@x.io");
}

#[tokio::test]
async fn set_active_organization_posts_the_server_session_mutation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/organization/set-active"))
        .and(body_json(json!({ "organizationId": "org_1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .await
        .set_active_organization("org_1")
        .await
        .unwrap();
}

#[tokio::test]
async fn organization_list_is_deduplicated_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/organization/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "org_1", "name": "Acme Inc", "slug": "acme-inc" },
            { "id": "org_2", "name": "Beta", "slug": "beta" },
            { "id": "org_1", "name": "Acme Inc", "slug": "acme-inc" }
        ])))
        .mount(&server)
        .await;

    let orgs = client(&server).await.list_organizations().await.unwrap();

    assert_eq!(
        orgs.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
        vec!["org_1", "org_2"]
    );
}

#[tokio::test]
async fn outline_crud_targets_the_org_scoped_routes() {
    let server = MockServer::start().await;

    let created = json!({
        "id": "out_1",
        "header": "Executive Summary",
        "sectionType": "Executive Summary",
        "status": "Pending",
        "target": 4,
        "limit": 8,
        "reviewer": "Assim"
    });

    Mock::given(method("POST"))
        .and(path("/api/org/org_1/outlines"))
        .and(body_json(json!({
            "header": "Executive Summary",
            "sectionType": "Executive Summary",
            "status": "Pending",
            "target": 4,
            "limit": 8,
            "reviewer": "Assim"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/org/org_1/outlines/out_1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let outline = client
        .create_outline(
            "org_1",
            OutlineCreateRequest {
                header: "Executive Summary".to_string(),
                section_type: SectionType::ExecutiveSummary,
                status: OutlineStatus::Pending,
                target: 4,
                limit: 8,
                reviewer: "Assim".to_string(),
            },
        )
        .await
        .unwrap()
        .into_inner();

    assert_eq!(outline.id, "out_1");

    client.delete_outline("org_1", "out_1").await.unwrap();
}
