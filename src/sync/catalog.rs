//! Courses, lecturers and departments.

use async_trait::async_trait;

use crate::api::models::{Course, CourseFields, Department, DepartmentFields, Lecturer, LecturerFields, ListFilter};
use crate::api::{ApiError, CourseApi};
use crate::constants::{CACHE_KEY_COURSES, CACHE_KEY_DEPARTMENTS, CACHE_KEY_LECTURERS};
use crate::sync::bus::Topic;
use crate::sync::resource::Resource;

pub struct Courses;

#[async_trait]
impl Resource for Courses {
    type Item = Course;
    type Filter = ListFilter;
    type Create = CourseFields;
    type Update = CourseFields;

    const TOPIC: Topic = Topic::Courses;
    const NAME: &'static str = "courses";

    // Only the unfiltered catalog is cached
    fn cache_key(filter: &ListFilter) -> Option<String> {
        filter.is_empty().then(|| CACHE_KEY_COURSES.to_string())
    }

    async fn fetch(api: &dyn CourseApi, filter: &ListFilter) -> Result<Vec<Course>, ApiError> {
        api.fetch_courses(filter).await
    }

    async fn create(api: &dyn CourseApi, fields: CourseFields) -> Result<Course, ApiError> {
        fields.validate()?;
        api.create_course(&fields).await
    }

    async fn update(api: &dyn CourseApi, id: &str, fields: CourseFields) -> Result<Course, ApiError> {
        fields.validate()?;
        api.update_course(id, &fields).await
    }

    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError> {
        api.delete_course(id).await
    }
}

pub struct Lecturers;

#[async_trait]
impl Resource for Lecturers {
    type Item = Lecturer;
    type Filter = ListFilter;
    type Create = LecturerFields;
    type Update = LecturerFields;

    const TOPIC: Topic = Topic::Lecturers;
    const NAME: &'static str = "lecturers";

    fn cache_key(filter: &ListFilter) -> Option<String> {
        filter.is_empty().then(|| CACHE_KEY_LECTURERS.to_string())
    }

    async fn fetch(api: &dyn CourseApi, filter: &ListFilter) -> Result<Vec<Lecturer>, ApiError> {
        api.fetch_lecturers(filter).await
    }

    async fn create(api: &dyn CourseApi, fields: LecturerFields) -> Result<Lecturer, ApiError> {
        fields.validate()?;
        api.create_lecturer(&fields).await
    }

    async fn update(api: &dyn CourseApi, id: &str, fields: LecturerFields) -> Result<Lecturer, ApiError> {
        fields.validate()?;
        api.update_lecturer(id, &fields).await
    }

    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError> {
        api.delete_lecturer(id).await
    }
}

pub struct Departments;

#[async_trait]
impl Resource for Departments {
    type Item = Department;
    type Filter = ();
    type Create = DepartmentFields;
    type Update = DepartmentFields;

    const TOPIC: Topic = Topic::Departments;
    const NAME: &'static str = "departments";

    fn cache_key(_: &()) -> Option<String> {
        Some(CACHE_KEY_DEPARTMENTS.to_string())
    }

    async fn fetch(api: &dyn CourseApi, _: &()) -> Result<Vec<Department>, ApiError> {
        api.fetch_departments().await
    }

    async fn create(api: &dyn CourseApi, fields: DepartmentFields) -> Result<Department, ApiError> {
        if fields.name.trim().is_empty() {
            return Err(ApiError::Validation("יש להזין שם חוג".to_string()));
        }
        api.create_department(&fields).await
    }

    async fn update(api: &dyn CourseApi, id: &str, fields: DepartmentFields) -> Result<Department, ApiError> {
        api.update_department(id, &fields).await
    }

    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError> {
        api.delete_department(id).await
    }
}
