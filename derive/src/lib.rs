use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quasiquote::{quasiquote, quote::quote};
use syn::{DataStruct, DeriveInput, Error, Fields, Ident, Type, parse};

/// Implements vertex buffer plumbing for a `#[repr(C)]` vertex struct.
///
/// Generates
/// - `ATTRIBUTES`: one `wgpu::VertexAttribute` per field, in field order,
///   with shader locations starting at 0
/// - `vertex_buffer_layout()`: an interleaved per-vertex layout using those attributes
/// - `BufferData for Vec<Self>`: a single interleaved vertex buffer
///
/// Field types must be `f32`, `u32`, `i32` or arrays of 2 to 4 of them.
#[proc_macro_derive(VertexBufferData)]
pub fn vertex_buffer_data(data: TokenStream) -> TokenStream {
    let strct: DeriveInput = match parse(data) {
        Ok(strct) => strct,
        Err(err) => return err.to_compile_error().into(),
    };
    let structname = strct.ident;
    let strct: DataStruct = match strct.data {
        syn::Data::Struct(strct) => strct,
        syn::Data::Enum(x) => {
            return Error::new(
                x.enum_token.span,
                "Vertex Buffer Data cannot be used on enums",
            )
            .to_compile_error()
            .into();
        }
        syn::Data::Union(x) => {
            return Error::new(
                x.union_token.span,
                "Vertex Buffer Data cannot be used on unions",
            )
            .to_compile_error()
            .into();
        }
    };

    let fields: Vec<(Ident, Type)> = match strct.fields {
        Fields::Named(named) => named
            .named
            .into_iter()
            .filter_map(|field| Some((field.ident?, field.ty)))
            .collect(),
        Fields::Unnamed(unnamed) => {
            return Error::new_spanned(
                unnamed,
                "Vertex Buffer Data requires named fields",
            )
            .to_compile_error()
            .into();
        }
        Fields::Unit => {
            return Error::new(
                strct.struct_token.span,
                "Vertex Buffer Data cannot be used on unit structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let mut attributes = Vec::with_capacity(fields.len());
    for (location, (ident, ty)) in fields.iter().enumerate() {
        let format = match vertex_format(ty) {
            Ok(format) => format,
            Err(err) => return err.to_compile_error().into(),
        };
        let location = location as u32;
        attributes.push(quasiquote!(
            ::wgpu::VertexAttribute {
                format: ::wgpu::VertexFormat::#format,
                offset: ::std::mem::offset_of!(#structname, #ident) as u64,
                shader_location: #{location},
            }
        ));
    }
    let attribute_count = attributes.len();

    let output = quote!(
        impl #structname {
            pub const ATTRIBUTES: [::wgpu::VertexAttribute; #attribute_count] = [#(#attributes),*];

            pub fn vertex_buffer_layout() -> ::wgpu::VertexBufferLayout<'static> {
                ::wgpu::VertexBufferLayout {
                    array_stride: ::std::mem::size_of::<Self>() as u64,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &Self::ATTRIBUTES,
                }
            }
        }

        impl crate::wgpu_context::BufferData for ::std::vec::Vec<#structname> {
            type Buffers = crate::wgpu_context::WGPUBuffer;
            fn create_buffers(&self, context: &crate::wgpu_context::WGPUContext) -> Self::Buffers {
                crate::wgpu_context::WGPUBuffer::new_vertex(
                    (::std::mem::size_of::<#structname>() * self.len()) as u64,
                    context,
                )
            }
            fn fill_buffers(&self, buffers: &mut Self::Buffers, context: &crate::wgpu_context::WGPUContext) {
                buffers.write_data(::bytemuck::cast_slice(self.as_slice()), context);
            }
        }
    );
    output.into()
}

/// Implements `BufferData` for a `#[repr(C)]` uniform struct as a single
/// uniform buffer rounded up to the uniform alignment
#[proc_macro_derive(UniformBufferData)]
pub fn uniform_buffer_data(data: TokenStream) -> TokenStream {
    let strct: DeriveInput = match parse(data) {
        Ok(strct) => strct,
        Err(err) => return err.to_compile_error().into(),
    };
    let structname = strct.ident;
    match strct.data {
        syn::Data::Struct(_) => (),
        syn::Data::Enum(x) => {
            return Error::new(
                x.enum_token.span,
                "Uniform Buffer Data cannot be used on enums",
            )
            .to_compile_error()
            .into();
        }
        syn::Data::Union(x) => {
            return Error::new(
                x.union_token.span,
                "Uniform Buffer Data cannot be used on unions",
            )
            .to_compile_error()
            .into();
        }
    }

    let output = quote!(
        impl crate::wgpu_context::BufferData for #structname {
            type Buffers = crate::wgpu_context::WGPUBuffer;
            fn create_buffers(&self, context: &crate::wgpu_context::WGPUContext) -> Self::Buffers {
                crate::wgpu_context::WGPUBuffer::new_uniform(::std::mem::size_of::<Self>() as u64, context)
            }
            fn fill_buffers(&self, buffers: &mut Self::Buffers, context: &crate::wgpu_context::WGPUContext) {
                buffers.write_data(::bytemuck::bytes_of(self), context);
            }
        }
    );
    output.into()
}

// Maps a field type onto the name of the matching `wgpu::VertexFormat` variant
fn vertex_format(ty: &Type) -> Result<TokenStream2, Error> {
    let name: String = quote!(#ty)
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let format = match name.as_str() {
        "f32" => "Float32",
        "[f32;2]" => "Float32x2",
        "[f32;3]" => "Float32x3",
        "[f32;4]" => "Float32x4",
        "u32" => "Uint32",
        "[u32;2]" => "Uint32x2",
        "[u32;3]" => "Uint32x3",
        "[u32;4]" => "Uint32x4",
        "i32" => "Sint32",
        "[i32;2]" => "Sint32x2",
        "[i32;3]" => "Sint32x3",
        "[i32;4]" => "Sint32x4",
        _ => {
            return Err(Error::new_spanned(
                ty,
                format!("Unsupported vertex attribute type: {}", name),
            ));
        }
    };
    let ident = Ident::new(format, proc_macro2::Span::call_site());
    Ok(quote!(#ident))
}
